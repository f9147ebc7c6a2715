//! Typed error enums shared across the quizflow crates.
//!
//! Defined in `quizflow-core` so the run engine can classify failures
//! without string matching.

use thiserror::Error;

/// Failures loading or validating a questionnaire definition.
///
/// All of these are fatal to starting a run; a run is never partially
/// started from a bad definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// No questionnaire with the requested id exists.
    #[error("questionnaire not found: {0}")]
    NotFound(String),

    /// The definition exists but fails shape validation.
    #[error("invalid questionnaire '{id}': {reason}")]
    Invalid { id: String, reason: String },

    /// The definition file could not be read.
    #[error("failed to read questionnaire definition: {0}")]
    Io(String),

    /// The definition file could not be parsed.
    #[error("failed to parse questionnaire definition: {0}")]
    Parse(String),
}

impl DefinitionError {
    /// Returns `true` when the questionnaire simply does not exist, as
    /// opposed to existing in a broken state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DefinitionError::NotFound(_))
    }
}

/// Failures computing a score.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Zero is a legitimate score, so an empty answer set must be an
    /// explicit error rather than a zero result.
    #[error("no answers to process")]
    NoAnswers,
}

/// Failures in a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A single backend rejected the operation.
    #[error("storage backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    /// Stored data could not be serialized or deserialized.
    #[error("failed to serialize stored data: {0}")]
    Serialization(String),

    /// Every backend in a fallback chain failed.
    #[error("all storage backends failed")]
    Exhausted,
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Failures surfaced by the run engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// A result or progress save failed. The in-memory run state is kept
    /// so the caller can retry without recomputation.
    #[error("failed to persist: {0}")]
    Persistence(#[from] StorageError),

    /// `go_next` was called before the current question was answered.
    #[error("question '{0}' has no answer yet")]
    Unanswered(String),

    /// The cursor points past the end of the active sequence.
    #[error("no current question")]
    NoCurrentQuestion,
}
