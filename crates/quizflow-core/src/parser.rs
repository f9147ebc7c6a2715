//! TOML questionnaire definition parser.
//!
//! Loads definitions from TOML files and directories, and validates them.
//! Shape invariants (non-empty id, title, and initial questions) are
//! enforced at parse time; everything softer becomes a warning.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Question, QuestionKind, QuestionnaireDefinition, QuestionOption, QuestionWeights,
    ScaleBounds, ScaleCondition, ScoringRules, Tier,
};

/// Intermediate TOML structure for parsing definition files.
#[derive(Debug, Deserialize)]
struct TomlDefinitionFile {
    questionnaire: TomlHeader,
    #[serde(default)]
    initial_questions: Vec<TomlQuestion>,
    #[serde(default)]
    question_flows: BTreeMap<String, Vec<TomlQuestion>>,
    #[serde(default)]
    scoring: Option<ScoringRules>,
    #[serde(default)]
    tiers: Vec<Tier>,
}

#[derive(Debug, Deserialize)]
struct TomlHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    estimated_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    prompt: String,
    #[serde(default)]
    options: Vec<QuestionOption>,
    #[serde(default)]
    scale: Option<ScaleBounds>,
    #[serde(default)]
    conditions: Vec<ScaleCondition>,
    #[serde(default)]
    weights: Option<QuestionWeights>,
}

/// Parse a single TOML file into a `QuestionnaireDefinition`.
pub fn parse_definition(path: &Path) -> Result<QuestionnaireDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read definition file: {}", path.display()))?;

    parse_definition_str(&content, path)
}

/// Parse a TOML string into a `QuestionnaireDefinition` (useful for
/// testing).
pub fn parse_definition_str(content: &str, source_path: &Path) -> Result<QuestionnaireDefinition> {
    let parsed: TomlDefinitionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    if parsed.questionnaire.id.trim().is_empty() {
        anyhow::bail!("questionnaire id must not be empty");
    }
    if parsed.questionnaire.title.trim().is_empty() {
        anyhow::bail!("questionnaire title must not be empty");
    }
    if parsed.initial_questions.is_empty() {
        anyhow::bail!("questionnaire must declare at least one initial question");
    }

    let initial_questions = parsed
        .initial_questions
        .into_iter()
        .map(convert_question)
        .collect::<Result<Vec<_>>>()?;

    let question_flows = parsed
        .question_flows
        .into_iter()
        .map(|(key, questions)| {
            let questions = questions
                .into_iter()
                .map(convert_question)
                .collect::<Result<Vec<_>>>()?;
            Ok((key, questions))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(QuestionnaireDefinition {
        id: parsed.questionnaire.id,
        title: parsed.questionnaire.title,
        description: parsed.questionnaire.description,
        version: parsed.questionnaire.version,
        category: parsed.questionnaire.category,
        tags: parsed.questionnaire.tags,
        estimated_minutes: parsed.questionnaire.estimated_minutes,
        initial_questions,
        question_flows,
        scoring: parsed.scoring,
        tiers: parsed.tiers,
    })
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    if q.id.trim().is_empty() {
        anyhow::bail!("question id must not be empty");
    }
    let kind: QuestionKind = q
        .kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

    Ok(Question {
        id: q.id,
        kind,
        prompt: q.prompt,
        options: q.options,
        scale: q.scale,
        conditions: q.conditions,
        weights: q.weights,
    })
}

/// Recursively load all `.toml` definition files from a directory.
///
/// Files that fail to parse are skipped with a warning rather than failing
/// the whole load.
pub fn load_definition_directory(dir: &Path) -> Result<Vec<QuestionnaireDefinition>> {
    let mut definitions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            definitions.extend(load_definition_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_definition(&path) {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(definitions)
}

/// A warning from definition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a definition for common issues.
///
/// All of these are soft: a definition with warnings still runs, with
/// dangling flow references resolving to "no next questions".
pub fn validate_definition(definition: &QuestionnaireDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let all_questions = || {
        definition
            .initial_questions
            .iter()
            .chain(definition.question_flows.values().flatten())
    };

    // Duplicate question ids across the initial set and every flow
    let mut seen_ids = std::collections::HashSet::new();
    for question in all_questions() {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question id: {}", question.id),
            });
        }
    }

    for question in all_questions() {
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "prompt is empty".into(),
            });
        }

        match question.kind {
            QuestionKind::Single | QuestionKind::Multiple => {
                if question.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: format!("{} question has no options", question.kind),
                    });
                }
                if !question.conditions.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: "conditions are only evaluated on scale questions".into(),
                    });
                }
            }
            QuestionKind::Scale => {
                if question.scale.is_none() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: "scale question has no bounds".into(),
                    });
                }
            }
        }

        // Dangling next_flow references (options and conditions)
        for opt in &question.options {
            if let Some(flow) = &opt.next_flow {
                if !definition.question_flows.contains_key(flow) {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.id.clone()),
                        message: format!(
                            "option '{}' references unknown flow '{}'",
                            opt.value, flow
                        ),
                    });
                }
            }
        }
        for cond in &question.conditions {
            if !definition.question_flows.contains_key(&cond.next_flow) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!(
                        "condition '{}' references unknown flow '{}'",
                        cond.name, cond.next_flow
                    ),
                });
            }
            if cond.min.is_none() && cond.max.is_none() {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("condition '{}' declares no bounds and never matches", cond.name),
                });
            }
        }
    }

    // Tier table coverage: without a zero-threshold tier, low scores have
    // no home.
    if !definition.tiers.is_empty() {
        if !definition.tiers.iter().any(|tier| tier.min == 0) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: "no tier has min = 0; low scores will fall to the worst tier".into(),
            });
        }
        let mut mins: Vec<i64> = definition.tiers.iter().map(|t| t.min).collect();
        mins.sort_unstable();
        mins.dedup();
        if mins.len() != definition.tiers.len() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: "tier thresholds are not distinct".into(),
            });
        }
    }

    warnings
}
