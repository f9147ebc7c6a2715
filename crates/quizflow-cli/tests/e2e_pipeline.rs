//! End-to-end pipeline test: flow branching → scoring → interpretation →
//! persistence, against in-memory collaborators.

use std::collections::BTreeMap;
use std::sync::Arc;

use quizflow_core::catalog::Catalog;
use quizflow_core::demographics::UserProfile;
use quizflow_core::engine::QuizEngine;
use quizflow_core::model::{
    Question, QuestionKind, QuestionnaireDefinition, QuestionOption, ScaleBounds, ScaleCondition,
    Tier,
};
use quizflow_core::results::AnswerValue;
use quizflow_core::session::StepOutcome;
use quizflow_core::traits::ResultSink;
use quizflow_interpret::StandardInterpreter;
use quizflow_storage::{MemoryBackend, ResultStore, StorageBackend};

fn scale_question(id: &str, conditions: Vec<ScaleCondition>) -> Question {
    Question {
        id: id.into(),
        kind: QuestionKind::Scale,
        prompt: format!("{id}?"),
        options: vec![],
        scale: Some(ScaleBounds {
            min: 1,
            max: 10,
            labels: BTreeMap::new(),
        }),
        conditions,
        weights: None,
    }
}

fn tier(level: &str, min: i64) -> Tier {
    Tier {
        level: level.into(),
        min,
        label: level.to_uppercase(),
        color: String::new(),
        description: String::new(),
        probability: None,
        recommendations: vec![format!("{level} advice")],
    }
}

/// A scale opener branching into a two-question flow on answers >= 7.
fn definition() -> QuestionnaireDefinition {
    QuestionnaireDefinition {
        id: "pipeline".into(),
        title: "Pipeline".into(),
        description: String::new(),
        version: "1.0.0".into(),
        category: "test".into(),
        tags: vec![],
        estimated_minutes: None,
        initial_questions: vec![scale_question(
            "opener",
            vec![ScaleCondition {
                name: "high".into(),
                min: Some(7.0),
                max: None,
                next_flow: "flow_high".into(),
            }],
        )],
        question_flows: BTreeMap::from([(
            "flow_high".to_string(),
            vec![
                scale_question("depth", vec![]),
                Question {
                    id: "reaction".into(),
                    kind: QuestionKind::Single,
                    prompt: "reaction?".into(),
                    options: vec![
                        QuestionOption {
                            value: "calm".into(),
                            label: "Calm".into(),
                            weight: 2.0,
                            required: false,
                            next_flow: None,
                        },
                        QuestionOption {
                            value: "tense".into(),
                            label: "Tense".into(),
                            weight: 5.0,
                            required: false,
                            next_flow: None,
                        },
                    ],
                    scale: None,
                    conditions: vec![],
                    weights: None,
                },
            ],
        )]),
        scoring: None,
        tiers: vec![tier("high", 20), tier("mid", 10), tier("low", 0)],
    }
}

fn engine(store: Arc<ResultStore>) -> QuizEngine {
    QuizEngine::new(
        Arc::new(Catalog::from_definitions(vec![definition()])),
        store,
        Arc::new(StandardInterpreter),
    )
}

#[tokio::test]
async fn full_pipeline_scores_interprets_and_persists() {
    let store = Arc::new(ResultStore::new(
        Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>
    ));
    let engine = engine(Arc::clone(&store));

    let profile = UserProfile {
        name: None,
        age: Some(30),
        gender: Some("female".into()),
        occupation: Some("developer".into()),
    };
    let mut run = engine.start("pipeline", "u1", Some(&profile)).await.unwrap();

    // 8 >= 7 → flow_high splices in right after the opener.
    run.submit_answer(AnswerValue::Scale(8.0)).await.unwrap();
    assert!(!run.is_last_question());
    assert_eq!(run.go_next().unwrap(), StepOutcome::Advanced);
    assert_eq!(run.current_question().unwrap().id, "depth");

    run.submit_answer(AnswerValue::Scale(5.0)).await.unwrap();
    assert_eq!(run.go_next().unwrap(), StepOutcome::Advanced);
    assert_eq!(run.current_question().unwrap().id, "reaction");

    run.submit_answer(AnswerValue::Single("tense".into()))
        .await
        .unwrap();
    assert!(run.is_last_question());
    assert_eq!(run.go_next().unwrap(), StepOutcome::Completed);

    let result = run.finish().await.unwrap().expect("first finish yields a result");

    // 8 + 5 + 5 = 18, × 1.1 (26-35) × 1.1 (female) = 21.78 → 22.
    assert_eq!(result.base_score, 18.0);
    assert_eq!(result.score, 22);
    assert_eq!(result.raw_score, 22);

    // 22 lands in the tier with the greatest min <= score.
    assert_eq!(result.interpretation.level, "high");
    assert_eq!(result.interpretation.range_max, None);
    assert_eq!(result.interpretation.recommendations, vec!["high advice"]);

    // Personalized notes picked up the occupation keyword.
    assert!(result
        .personalized_notes
        .iter()
        .any(|note| note.contains("IT work")));

    // Persisted exactly once, progress checkpoint cleared.
    let saved = store.load_results("u1", Some("pipeline")).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].score, 22);
    assert!(store.load_progress("u1", "pipeline").await.unwrap().is_none());

    // A duplicate finish is suppressed and saves nothing new.
    assert!(run.finish().await.unwrap().is_none());
    assert_eq!(store.load_results("u1", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn low_answer_completes_without_branching() {
    let store = Arc::new(ResultStore::new(
        Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>
    ));
    let engine = engine(Arc::clone(&store));
    let mut run = engine.start("pipeline", "u1", None).await.unwrap();

    run.submit_answer(AnswerValue::Scale(3.0)).await.unwrap();
    assert!(run.is_last_question());
    assert_eq!(run.go_next().unwrap(), StepOutcome::Completed);

    let result = run.finish().await.unwrap().unwrap();
    // 3 × 1.1 × 1.15 (default other) = 3.795 → 4 → "low" tier.
    assert_eq!(result.score, 4);
    assert_eq!(result.interpretation.level, "low");
    assert_eq!(result.interpretation.range_max, Some(9));
}

#[tokio::test]
async fn interrupted_run_resumes_from_checkpoint() {
    let store = Arc::new(ResultStore::new(
        Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>
    ));
    let engine = engine(Arc::clone(&store));

    {
        let mut run = engine.start("pipeline", "u1", None).await.unwrap();
        run.submit_answer(AnswerValue::Scale(8.0)).await.unwrap();
        run.go_next().unwrap();
        run.submit_answer(AnswerValue::Scale(5.0)).await.unwrap();
        // Dropped here: the checkpoint written on submit survives.
    }

    let mut resumed = engine.resume("pipeline", "u1", None).await.unwrap();
    assert_eq!(resumed.current_question().unwrap().id, "depth");
    assert_eq!(resumed.answered_count(), 2);

    resumed.go_next().unwrap();
    resumed
        .submit_answer(AnswerValue::Single("calm".into()))
        .await
        .unwrap();
    assert_eq!(resumed.go_next().unwrap(), StepOutcome::Completed);
    assert!(resumed.finish().await.unwrap().is_some());
}
