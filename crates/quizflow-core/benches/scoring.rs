use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::collections::BTreeMap;

use chrono::Utc;
use quizflow_core::demographics::DemographicProfile;
use quizflow_core::flow;
use quizflow_core::model::{
    Question, QuestionKind, QuestionnaireDefinition, QuestionOption, ScaleCondition,
};
use quizflow_core::results::{AnswerRecord, AnswerSet, AnswerValue};
use quizflow_core::scoring;

fn option(value: &str, weight: f64) -> QuestionOption {
    QuestionOption {
        value: value.into(),
        label: value.to_uppercase(),
        weight,
        required: false,
        next_flow: None,
    }
}

fn make_definition(question_count: usize) -> QuestionnaireDefinition {
    let questions = (0..question_count)
        .map(|i| Question {
            id: format!("q{i}"),
            kind: QuestionKind::Multiple,
            prompt: format!("Question {i}?"),
            options: (0..6).map(|j| option(&format!("o{j}"), j as f64)).collect(),
            scale: None,
            conditions: vec![],
            weights: None,
        })
        .collect();

    QuestionnaireDefinition {
        id: "bench".into(),
        title: "Bench".into(),
        description: String::new(),
        version: String::new(),
        category: String::new(),
        tags: vec![],
        estimated_minutes: None,
        initial_questions: questions,
        question_flows: BTreeMap::new(),
        scoring: None,
        tiers: vec![],
    }
}

fn make_answers(question_count: usize) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for i in 0..question_count {
        answers.insert(AnswerRecord {
            question_id: format!("q{i}"),
            prompt: format!("Question {i}?"),
            answer: AnswerValue::Multiple(vec!["o1".into(), "o3".into(), "o5".into()]),
            timestamp: Utc::now(),
            kind: QuestionKind::Multiple,
        });
    }
    answers
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let demographics = DemographicProfile::default();

    for count in [5usize, 25, 100] {
        let definition = make_definition(count);
        let answers = make_answers(count);
        group.bench_function(format!("questions={count}"), |b| {
            b.iter(|| {
                scoring::score(
                    black_box(&answers),
                    black_box(&definition),
                    black_box(&demographics),
                )
            })
        });
    }

    group.finish();
}

fn bench_next_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_group");

    let mut definition = make_definition(1);
    definition.question_flows.insert(
        "high".into(),
        vec![Question {
            id: "followup".into(),
            kind: QuestionKind::Scale,
            prompt: "Follow up?".into(),
            options: vec![],
            scale: None,
            conditions: vec![],
            weights: None,
        }],
    );

    let scale_question = Question {
        id: "scale".into(),
        kind: QuestionKind::Scale,
        prompt: "Scale?".into(),
        options: vec![],
        scale: None,
        conditions: (0..10)
            .map(|i| ScaleCondition {
                name: format!("band{i}"),
                min: Some(i as f64),
                max: Some(i as f64 + 0.9),
                next_flow: "high".into(),
            })
            .collect(),
        weights: None,
    };

    group.bench_function("scale_10_conditions", |b| {
        let answer = AnswerValue::Scale(9.5);
        b.iter(|| flow::next_group(black_box(&scale_question), black_box(&answer), &definition))
    });

    let multiple_question = Question {
        id: "multi".into(),
        kind: QuestionKind::Multiple,
        prompt: "Multi?".into(),
        options: (0..20)
            .map(|i| {
                let mut opt = option(&format!("o{i}"), i as f64);
                opt.next_flow = Some("high".into());
                opt
            })
            .collect(),
        scale: None,
        conditions: vec![],
        weights: None,
    };

    group.bench_function("multiple_20_options", |b| {
        let answer =
            AnswerValue::Multiple((0..20).map(|i| format!("o{i}")).collect::<Vec<_>>());
        b.iter(|| flow::next_group(black_box(&multiple_question), black_box(&answer), &definition))
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_next_group);
criterion_main!(benches);
