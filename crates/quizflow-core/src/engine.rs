//! Run orchestration: wiring loader, session, scoring, interpretation, and
//! persistence into one owned run.
//!
//! The core computation stays synchronous and pure; the only async
//! boundaries are the collaborator edges (definition loading, persistence),
//! which may take arbitrarily long.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::demographics::{self, DemographicProfile, UserProfile};
use crate::error::EngineError;
use crate::model::{Question, QuestionnaireDefinition};
use crate::results::{AnswerValue, CompletedResult, RunProgress};
use crate::scoring;
use crate::session::{RunSession, StepOutcome};
use crate::traits::{DefinitionLoader, Interpreter, ResultSink};

/// Orchestrates questionnaire runs against pluggable collaborators.
pub struct QuizEngine {
    loader: Arc<dyn DefinitionLoader>,
    sink: Arc<dyn ResultSink>,
    interpreter: Arc<dyn Interpreter>,
}

impl QuizEngine {
    pub fn new(
        loader: Arc<dyn DefinitionLoader>,
        sink: Arc<dyn ResultSink>,
        interpreter: Arc<dyn Interpreter>,
    ) -> Self {
        Self {
            loader,
            sink,
            interpreter,
        }
    }

    /// Start a fresh run.
    ///
    /// Fails before any run state exists when the definition is missing or
    /// invalid; a run is never partially started.
    pub async fn start(
        &self,
        questionnaire_id: &str,
        user_id: &str,
        profile: Option<&UserProfile>,
    ) -> Result<TestRun, EngineError> {
        let definition = self.loader.load(questionnaire_id).await?;
        Ok(self.make_run(definition, user_id, profile, None))
    }

    /// Resume a run from saved progress, or start fresh when none exists.
    pub async fn resume(
        &self,
        questionnaire_id: &str,
        user_id: &str,
        profile: Option<&UserProfile>,
    ) -> Result<TestRun, EngineError> {
        let definition = self.loader.load(questionnaire_id).await?;
        let progress = self.sink.load_progress(user_id, questionnaire_id).await?;
        Ok(self.make_run(definition, user_id, profile, progress))
    }

    fn make_run(
        &self,
        definition: Arc<QuestionnaireDefinition>,
        user_id: &str,
        profile: Option<&UserProfile>,
        progress: Option<RunProgress>,
    ) -> TestRun {
        let demographics = demographics::resolve(profile);
        let session = match progress {
            Some(progress) => RunSession::restore(Arc::clone(&definition), progress),
            None => RunSession::new(Arc::clone(&definition)),
        };
        TestRun {
            definition,
            session,
            demographics,
            user_id: user_id.to_string(),
            sink: Arc::clone(&self.sink),
            interpreter: Arc::clone(&self.interpreter),
            finishing: false,
            pending: None,
        }
    }
}

/// One in-flight questionnaire run, owned by a single logical caller.
pub struct TestRun {
    definition: Arc<QuestionnaireDefinition>,
    session: RunSession,
    demographics: DemographicProfile,
    user_id: String,
    sink: Arc<dyn ResultSink>,
    interpreter: Arc<dyn Interpreter>,
    /// Set once a finish has begun; drops repeated finish calls.
    finishing: bool,
    /// Computed result awaiting a successful save, kept so a retry never
    /// recomputes.
    pending: Option<CompletedResult>,
}

impl std::fmt::Debug for TestRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRun")
            .field("definition", &self.definition.id)
            .field("user_id", &self.user_id)
            .field("finishing", &self.finishing)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl TestRun {
    pub fn definition(&self) -> &QuestionnaireDefinition {
        &self.definition
    }

    pub fn demographics(&self) -> &DemographicProfile {
        &self.demographics
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn progress_percent(&self) -> u8 {
        self.session.progress_percent()
    }

    pub fn is_last_question(&self) -> bool {
        self.session.is_last_question()
    }

    pub fn answered_count(&self) -> usize {
        self.session.answers().len()
    }

    /// Record an answer for the current question and checkpoint progress.
    ///
    /// A failed checkpoint is logged but never rejects the answer.
    pub async fn submit_answer(&mut self, answer: AnswerValue) -> Result<(), EngineError> {
        self.session.submit_answer(answer)?;
        let progress = self.session.snapshot();
        if let Err(e) = self
            .sink
            .save_progress(&self.user_id, &self.definition.id, &progress)
            .await
        {
            tracing::warn!(error = %e, "failed to checkpoint progress");
        }
        Ok(())
    }

    pub fn go_next(&mut self) -> Result<StepOutcome, EngineError> {
        self.session.go_next()
    }

    pub fn go_previous(&mut self) -> bool {
        self.session.go_previous()
    }

    /// Complete the run: score once, interpret, persist.
    ///
    /// Idempotency guard: while a finish is in flight, and after one has
    /// succeeded, further calls return `Ok(None)` and are otherwise
    /// dropped, so a result is never saved twice for one run. A
    /// persistence failure releases the guard and keeps the computed
    /// result, so a retry re-attempts the save without recomputation.
    pub async fn finish(&mut self) -> Result<Option<CompletedResult>, EngineError> {
        if self.finishing {
            tracing::debug!("finish already in progress, dropping duplicate call");
            return Ok(None);
        }
        self.finishing = true;

        let result = match self.pending.take() {
            Some(result) => result,
            None => match self.compute_result() {
                Ok(result) => result,
                Err(e) => {
                    self.finishing = false;
                    return Err(e);
                }
            },
        };

        if let Err(e) = self.sink.save_result(&self.user_id, &result).await {
            self.pending = Some(result);
            self.finishing = false;
            return Err(EngineError::Persistence(e));
        }

        if let Err(e) = self
            .sink
            .clear_progress(&self.user_id, &self.definition.id)
            .await
        {
            tracing::warn!(error = %e, "failed to clear saved progress");
        }

        Ok(Some(result))
    }

    fn compute_result(&self) -> Result<CompletedResult, EngineError> {
        let outcome = scoring::score(self.session.answers(), &self.definition, &self.demographics)?;
        let interpretation =
            self.interpreter
                .interpret(&outcome, &self.definition, &self.demographics);
        let personalized_notes =
            self.interpreter
                .personalized_notes(&outcome, &self.definition, &self.demographics);

        Ok(CompletedResult {
            id: Uuid::new_v4(),
            questionnaire_id: outcome.questionnaire_id.clone(),
            user_id: Some(self.user_id.clone()),
            score: outcome.score,
            raw_score: outcome.raw_score,
            base_score: outcome.base_score,
            breakdown: outcome.breakdown,
            question_count: outcome.question_count,
            required_count: outcome.required_count,
            minimum_met: outcome.minimum_met,
            demographics: self.demographics.clone(),
            interpretation,
            personalized_notes,
            completed_at: Utc::now(),
        })
    }

    /// Abandon the run, dropping its in-memory state and any saved
    /// checkpoint.
    pub async fn abandon(self) -> Result<(), EngineError> {
        self.sink
            .clear_progress(&self.user_id, &self.definition.id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{DefinitionError, ScoringError, StorageError};
    use crate::model::{QuestionKind, ScaleCondition};
    use crate::results::{Interpretation, ScoreOutcome};

    struct StaticLoader {
        definitions: HashMap<String, Arc<QuestionnaireDefinition>>,
    }

    #[async_trait]
    impl DefinitionLoader for StaticLoader {
        async fn load(
            &self,
            questionnaire_id: &str,
        ) -> Result<Arc<QuestionnaireDefinition>, DefinitionError> {
            self.definitions
                .get(questionnaire_id)
                .cloned()
                .ok_or_else(|| DefinitionError::NotFound(questionnaire_id.to_string()))
        }
    }

    /// Instrumented sink: counts saves, can fail the next result save.
    #[derive(Default)]
    struct RecordingSink {
        results: Mutex<Vec<CompletedResult>>,
        progress: Mutex<HashMap<String, RunProgress>>,
        fail_next_save: AtomicBool,
        save_attempts: AtomicU32,
    }

    #[async_trait]
    impl ResultSink for RecordingSink {
        async fn save_result(
            &self,
            _user_id: &str,
            result: &CompletedResult,
        ) -> Result<(), StorageError> {
            self.save_attempts.fetch_add(1, Ordering::Relaxed);
            if self.fail_next_save.swap(false, Ordering::Relaxed) {
                return Err(StorageError::Backend {
                    backend: "test".into(),
                    message: "injected failure".into(),
                });
            }
            self.results.lock().unwrap().push(result.clone());
            Ok(())
        }

        async fn load_results(
            &self,
            _user_id: &str,
            _questionnaire_id: Option<&str>,
        ) -> Result<Vec<CompletedResult>, StorageError> {
            Ok(self.results.lock().unwrap().clone())
        }

        async fn save_progress(
            &self,
            user_id: &str,
            questionnaire_id: &str,
            progress: &RunProgress,
        ) -> Result<(), StorageError> {
            self.progress
                .lock()
                .unwrap()
                .insert(format!("{user_id}/{questionnaire_id}"), progress.clone());
            Ok(())
        }

        async fn load_progress(
            &self,
            user_id: &str,
            questionnaire_id: &str,
        ) -> Result<Option<RunProgress>, StorageError> {
            Ok(self
                .progress
                .lock()
                .unwrap()
                .get(&format!("{user_id}/{questionnaire_id}"))
                .cloned())
        }

        async fn clear_progress(
            &self,
            user_id: &str,
            questionnaire_id: &str,
        ) -> Result<(), StorageError> {
            self.progress
                .lock()
                .unwrap()
                .remove(&format!("{user_id}/{questionnaire_id}"));
            Ok(())
        }
    }

    struct FixedInterpreter;

    impl Interpreter for FixedInterpreter {
        fn interpret(
            &self,
            outcome: &ScoreOutcome,
            _definition: &QuestionnaireDefinition,
            _demographics: &DemographicProfile,
        ) -> Interpretation {
            Interpretation {
                level: "fixed".into(),
                label: format!("score {}", outcome.score),
                color: "#000000".into(),
                description: String::new(),
                probability: None,
                range_min: 0,
                range_max: None,
                recommendations: vec![],
            }
        }
    }

    fn simple_definition() -> QuestionnaireDefinition {
        let mut start = Question {
            id: "start".into(),
            kind: QuestionKind::Scale,
            prompt: "How much?".into(),
            options: vec![],
            scale: None,
            conditions: vec![],
            weights: None,
        };
        start.conditions = vec![ScaleCondition {
            name: "high".into(),
            min: Some(7.0),
            max: None,
            next_flow: "deep".into(),
        }];

        QuestionnaireDefinition {
            id: "simple".into(),
            title: "Simple".into(),
            description: String::new(),
            version: String::new(),
            category: String::new(),
            tags: vec![],
            estimated_minutes: None,
            initial_questions: vec![start],
            question_flows: BTreeMap::from([(
                "deep".to_string(),
                vec![Question {
                    id: "deep1".into(),
                    kind: QuestionKind::Scale,
                    prompt: "Deeper?".into(),
                    options: vec![],
                    scale: None,
                    conditions: vec![],
                    weights: None,
                }],
            )]),
            scoring: None,
            tiers: vec![],
        }
    }

    fn engine_with(sink: Arc<RecordingSink>) -> QuizEngine {
        let loader = StaticLoader {
            definitions: HashMap::from([(
                "simple".to_string(),
                Arc::new(simple_definition()),
            )]),
        };
        QuizEngine::new(Arc::new(loader), sink, Arc::new(FixedInterpreter))
    }

    #[tokio::test]
    async fn missing_definition_never_starts_a_run() {
        let engine = engine_with(Arc::new(RecordingSink::default()));
        let err = engine.start("ghost", "u1", None).await.unwrap_err();
        assert!(matches!(err, EngineError::Definition(e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn full_run_saves_once_and_clears_progress() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));
        let mut run = engine.start("simple", "u1", None).await.unwrap();

        run.submit_answer(AnswerValue::Scale(8.0)).await.unwrap();
        assert!(!sink.progress.lock().unwrap().is_empty());
        assert_eq!(run.go_next().unwrap(), StepOutcome::Advanced);
        run.submit_answer(AnswerValue::Scale(2.0)).await.unwrap();
        assert_eq!(run.go_next().unwrap(), StepOutcome::Completed);

        let result = run.finish().await.unwrap().expect("first finish yields a result");
        // 8 + 2 = 10 × 1.1 (26-35 default) × 1.15 (other default) = 12.65 → 13.
        assert_eq!(result.score, 13);
        assert_eq!(sink.results.lock().unwrap().len(), 1);
        assert!(sink.progress.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_finish_is_suppressed() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));
        let mut run = engine.start("simple", "u1", None).await.unwrap();

        run.submit_answer(AnswerValue::Scale(1.0)).await.unwrap();
        run.go_next().unwrap();

        assert!(run.finish().await.unwrap().is_some());
        assert!(run.finish().await.unwrap().is_none());
        assert_eq!(sink.results.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn finish_with_no_answers_is_rejected_and_state_preserved() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));
        let mut run = engine.start("simple", "u1", None).await.unwrap();

        let err = run.finish().await.unwrap_err();
        assert!(matches!(err, EngineError::Scoring(ScoringError::NoAnswers)));

        // The run can still proceed and finish after answering.
        run.submit_answer(AnswerValue::Scale(1.0)).await.unwrap();
        run.go_next().unwrap();
        assert!(run.finish().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failed_save_retries_without_recomputation() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));
        let mut run = engine.start("simple", "u1", None).await.unwrap();

        run.submit_answer(AnswerValue::Scale(1.0)).await.unwrap();
        run.go_next().unwrap();

        sink.fail_next_save.store(true, Ordering::Relaxed);
        let err = run.finish().await.unwrap_err();
        assert!(matches!(err, EngineError::Persistence(_)));
        assert_eq!(sink.results.lock().unwrap().len(), 0);

        let first_id = run.pending.as_ref().map(|r| r.id).unwrap();
        let result = run.finish().await.unwrap().expect("retry saves the result");
        // Same computed result, not a recomputed one.
        assert_eq!(result.id, first_id);
        assert_eq!(sink.save_attempts.load(Ordering::Relaxed), 2);
        assert_eq!(sink.results.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resume_restores_saved_progress() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));

        {
            let mut run = engine.start("simple", "u1", None).await.unwrap();
            run.submit_answer(AnswerValue::Scale(8.0)).await.unwrap();
            run.go_next().unwrap();
            run.submit_answer(AnswerValue::Scale(3.0)).await.unwrap();
            // Abandoned mid-run: in-memory state dropped, checkpoint kept.
        }

        let resumed = engine.resume("simple", "u1", None).await.unwrap();
        assert_eq!(resumed.answered_count(), 2);
        assert_eq!(resumed.current_question().unwrap().id, "deep1");
    }

    #[tokio::test]
    async fn abandon_clears_checkpoint() {
        let sink = Arc::new(RecordingSink::default());
        let engine = engine_with(Arc::clone(&sink));

        let mut run = engine.start("simple", "u1", None).await.unwrap();
        run.submit_answer(AnswerValue::Scale(8.0)).await.unwrap();
        assert!(!sink.progress.lock().unwrap().is_empty());

        run.abandon().await.unwrap();
        assert!(sink.progress.lock().unwrap().is_empty());
    }
}
