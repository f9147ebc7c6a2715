//! Core data model types for quizflow.
//!
//! These are the fundamental types that the entire quizflow system uses to
//! represent questions, branch conditions, and questionnaire definitions.
//! A definition is pure data: all behavior lives in the flow, scoring, and
//! interpretation engines.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::demographics::{AgeBracket, GenderCategory};

/// How a question is presented and answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option is chosen.
    Single,
    /// Any number of options are chosen.
    Multiple,
    /// A numeric value within declared bounds.
    Scale,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single"),
            QuestionKind::Multiple => write!(f, "multiple"),
            QuestionKind::Scale => write!(f, "scale"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multiple" => Ok(QuestionKind::Multiple),
            "scale" => Ok(QuestionKind::Scale),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// One selectable option of a `single` or `multiple` question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Stable value submitted as the answer.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
    /// Signed score contribution when this option is selected.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Counts toward the questionnaire's required-trait minimum.
    #[serde(default)]
    pub required: bool,
    /// Flow key spliced into the active sequence when this option drives
    /// branching.
    #[serde(default)]
    pub next_flow: Option<String>,
}

fn default_weight() -> f64 {
    2.0
}

/// Numeric bounds of a `scale` question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: i64,
    pub max: i64,
    /// Optional endpoint labels keyed by the scale value ("1" → "Very low").
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A named branching predicate of a `scale` question.
///
/// A missing bound means unbounded on that side. Conditions are evaluated
/// in declared order; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleCondition {
    pub name: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub next_flow: String,
}

/// Per-question demographic weight tables for `scale` questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemographicWeights {
    #[serde(default)]
    pub age: BTreeMap<AgeBracket, f64>,
    #[serde(default)]
    pub gender: BTreeMap<GenderCategory, f64>,
}

/// Optional scoring weights attached to a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionWeights {
    #[serde(default)]
    pub demographic: Option<DemographicWeights>,
}

/// One prompt presented to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier, stable across the questionnaire's lifetime.
    pub id: String,
    /// How the question is presented and answered.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// The question text.
    pub prompt: String,
    /// Options for `single` and `multiple` questions.
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    /// Bounds for `scale` questions.
    #[serde(default)]
    pub scale: Option<ScaleBounds>,
    /// Branching predicates for `scale` questions, in declared order.
    #[serde(default)]
    pub conditions: Vec<ScaleCondition>,
    /// Optional per-question scoring weights.
    #[serde(default)]
    pub weights: Option<QuestionWeights>,
}

/// A single demographic multiplier plus optional interpretation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierEntry {
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Free-text note surfaced in personalized feedback.
    #[serde(default)]
    pub note: Option<String>,
    /// Risk factors surfaced in personalized feedback.
    #[serde(default)]
    pub specific_risks: Vec<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Per-questionnaire demographic modifier tables. When absent, the
/// engine-wide defaults apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierTable {
    #[serde(default)]
    pub age: BTreeMap<AgeBracket, ModifierEntry>,
    #[serde(default)]
    pub gender: BTreeMap<GenderCategory, ModifierEntry>,
}

/// Scoring rules declared by a questionnaire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default)]
    pub modifiers: Option<ModifierTable>,
    /// Minimum number of selected required-flagged options for the result
    /// to count as meeting its mandatory conditions.
    #[serde(default)]
    pub required_minimum: Option<u32>,
    /// Score penalty per missing required item.
    #[serde(default = "default_required_penalty")]
    pub required_penalty: f64,
}

fn default_required_penalty() -> f64 {
    50.0
}

/// One scored result bracket.
///
/// Tiers are selected by threshold: the highest `min` not exceeding the
/// score wins. The upper bound is implicit (one below the next tier's
/// `min`); the top tier is open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier {
    /// Stable identifier ("excellent", "critical", ...).
    pub level: String,
    /// Inclusive lower score threshold.
    pub min: i64,
    pub label: String,
    /// Color token for presentation.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    /// Optional probability/confidence figure in percent.
    #[serde(default)]
    pub probability: Option<u8>,
    /// Fixed recommendation texts for this tier.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A complete, immutable questionnaire definition, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    /// Always asked, in order, before any branching.
    pub initial_questions: Vec<Question>,
    /// Named follow-up groups selected by branching rules.
    #[serde(default)]
    pub question_flows: BTreeMap<String, Vec<Question>>,
    #[serde(default)]
    pub scoring: Option<ScoringRules>,
    /// Interpretation tiers. Empty means the universal fallback applies.
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

impl QuestionnaireDefinition {
    /// The questions of a flow, or an empty slice for a dangling key.
    pub fn flow(&self, key: &str) -> &[Question] {
        self.question_flows
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a question by id, searching the initial questions first, then
    /// each flow in key order.
    pub fn find_question(&self, id: &str) -> Option<&Question> {
        self.initial_questions
            .iter()
            .find(|q| q.id == id)
            .or_else(|| {
                self.question_flows
                    .values()
                    .flat_map(|flow| flow.iter())
                    .find(|q| q.id == id)
            })
    }

    /// Total number of questions across the initial set and every flow.
    pub fn question_count(&self) -> usize {
        self.initial_questions.len()
            + self
                .question_flows
                .values()
                .map(Vec::len)
                .sum::<usize>()
    }
}
