//! Collaborator contracts consumed by the run engine.
//!
//! These traits are implemented by the `quizflow-storage` crate
//! (persistence) and the `quizflow-interpret` crate (interpretation); the
//! catalog in this crate provides the default `DefinitionLoader`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::demographics::DemographicProfile;
use crate::error::{DefinitionError, StorageError};
use crate::model::QuestionnaireDefinition;
use crate::results::{CompletedResult, Interpretation, RunProgress, ScoreOutcome};

/// Source of questionnaire definitions.
///
/// Implementations must validate shape before returning; an invalid
/// definition is an error, never a partially usable value.
#[async_trait]
pub trait DefinitionLoader: Send + Sync {
    async fn load(
        &self,
        questionnaire_id: &str,
    ) -> Result<Arc<QuestionnaireDefinition>, DefinitionError>;
}

/// Persistence for completed results and in-flight run progress.
///
/// The engine calls these at well-defined points: progress after each
/// answer, a result once at completion. Implementations own the storage
/// medium entirely.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Append a completed result to the user's history.
    async fn save_result(
        &self,
        user_id: &str,
        result: &CompletedResult,
    ) -> Result<(), StorageError>;

    /// Load the user's history, newest first, optionally filtered by
    /// questionnaire.
    async fn load_results(
        &self,
        user_id: &str,
        questionnaire_id: Option<&str>,
    ) -> Result<Vec<CompletedResult>, StorageError>;

    /// Checkpoint an in-flight run.
    async fn save_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
        progress: &RunProgress,
    ) -> Result<(), StorageError>;

    /// Load a previously saved checkpoint, if any.
    async fn load_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
    ) -> Result<Option<RunProgress>, StorageError>;

    /// Drop a saved checkpoint.
    async fn clear_progress(
        &self,
        user_id: &str,
        questionnaire_id: &str,
    ) -> Result<(), StorageError>;
}

/// Maps a scoring outcome onto a human-readable interpretation.
///
/// Pure and synchronous; must never fail — unknown shapes resolve to a
/// neutral interpretation.
pub trait Interpreter: Send + Sync {
    fn interpret(
        &self,
        outcome: &ScoreOutcome,
        definition: &QuestionnaireDefinition,
        demographics: &DemographicProfile,
    ) -> Interpretation;

    /// Optional free-text notes personalized from demographics and the
    /// outcome. Each independent rule contributes zero or one note.
    fn personalized_notes(
        &self,
        _outcome: &ScoreOutcome,
        _definition: &QuestionnaireDefinition,
        _demographics: &DemographicProfile,
    ) -> Vec<String> {
        Vec::new()
    }
}
