//! Answer records, scoring outcomes, and completed-run result types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::demographics::DemographicProfile;
use crate::model::{Question, QuestionKind};

/// The submitted value of one answer. Shape depends on the question kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scale(f64),
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// An empty submission does not count as an answer.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Single(value) => value.is_empty(),
            AnswerValue::Multiple(values) => values.is_empty(),
            AnswerValue::Scale(_) => false,
        }
    }

    pub fn as_scale(&self) -> Option<f64> {
        match self {
            AnswerValue::Scale(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            AnswerValue::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Multiple(values) => Some(values),
            _ => None,
        }
    }
}

/// One answered question.
///
/// Created or overwritten on each submission for its question id; never
/// deleted individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    /// Prompt text snapshot at the time of answering.
    pub prompt: String,
    pub answer: AnswerValue,
    pub timestamp: DateTime<Utc>,
    pub kind: QuestionKind,
}

/// All answers of one run, keyed by question id.
///
/// The whole set is cleared when a run restarts; individual records are
/// only ever overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSet {
    records: BTreeMap<String, AnswerRecord>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: AnswerRecord) {
        self.records.insert(record.question_id.clone(), record);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerRecord> {
        self.records.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.records.values()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Per-question contribution to the aggregate score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdownEntry {
    pub question_id: String,
    pub prompt: String,
    pub answer: AnswerValue,
    pub score: f64,
    pub kind: QuestionKind,
}

/// Output of the scoring engine for one completed answer set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub questionnaire_id: String,
    /// Final reported score. Never negative.
    pub score: i64,
    /// Post-modifier value before the zero floor, kept for diagnostics.
    pub raw_score: i64,
    /// Pre-modifier aggregate of the per-question scores.
    pub base_score: f64,
    pub breakdown: Vec<ScoreBreakdownEntry>,
    /// Number of answers that resolved to a known question.
    pub question_count: usize,
    /// Selected options flagged as required.
    pub required_count: u32,
    /// False when the definition declares a required minimum that was not
    /// reached.
    pub minimum_met: bool,
    pub age_multiplier: f64,
    pub gender_multiplier: f64,
}

/// A score mapped onto a result tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
    pub level: String,
    pub label: String,
    pub color: String,
    pub description: String,
    #[serde(default)]
    pub probability: Option<u8>,
    /// Inclusive lower bound of the selected tier.
    pub range_min: i64,
    /// Inclusive upper bound; `None` for the open-ended top tier.
    #[serde(default)]
    pub range_max: Option<i64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// The immutable result of one completed run.
///
/// Created once at completion; ownership passes to the persistence sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedResult {
    pub id: Uuid,
    pub questionnaire_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub score: i64,
    pub raw_score: i64,
    pub base_score: f64,
    pub breakdown: Vec<ScoreBreakdownEntry>,
    pub question_count: usize,
    pub required_count: u32,
    pub minimum_met: bool,
    /// Demographic profile snapshot taken at the start of the run.
    pub demographics: DemographicProfile,
    pub interpretation: Interpretation,
    #[serde(default)]
    pub personalized_notes: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Serializable snapshot of an in-flight run, for resumable progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunProgress {
    pub cursor: usize,
    pub active_sequence: Vec<Question>,
    pub answers: AnswerSet,
}
