//! Scoring: per-question rules, demographic modifiers, and the zero floor.
//!
//! Answers referencing unknown question ids are skipped with a warning and
//! scoring continues; an empty answer set is an explicit error because zero
//! is a legitimate score.

use crate::demographics::DemographicProfile;
use crate::error::ScoringError;
use crate::model::{Question, QuestionKind, QuestionnaireDefinition};
use crate::results::{AnswerRecord, AnswerSet, AnswerValue, ScoreBreakdownEntry, ScoreOutcome};

/// Score awarded when an answer's shape cannot be matched against its
/// question's kind.
const FALLBACK_SCORE: f64 = 2.0;

/// Compute the aggregate score for a completed answer set.
///
/// The pipeline: per-question scores are summed into a base aggregate, the
/// global demographic multipliers are applied and the product rounded, the
/// required-trait penalty (if the definition declares a minimum) is
/// subtracted, and the result is floored at zero. The pre-floor value is
/// retained as `raw_score`.
pub fn score(
    answers: &AnswerSet,
    definition: &QuestionnaireDefinition,
    demographics: &DemographicProfile,
) -> Result<ScoreOutcome, ScoringError> {
    if answers.is_empty() {
        return Err(ScoringError::NoAnswers);
    }

    let mut base_score = 0.0;
    let mut required_count = 0u32;
    let mut question_count = 0usize;
    let mut breakdown = Vec::new();

    for record in answers.iter() {
        let Some(question) = definition.find_question(&record.question_id) else {
            tracing::warn!(
                question_id = %record.question_id,
                "answer references unknown question, skipping"
            );
            continue;
        };

        question_count += 1;
        let question_score = score_answer(record, question, demographics);
        required_count += count_required(record, question);
        base_score += question_score;

        breakdown.push(ScoreBreakdownEntry {
            question_id: record.question_id.clone(),
            prompt: record.prompt.clone(),
            answer: record.answer.clone(),
            score: question_score,
            kind: question.kind,
        });
    }

    let (age_multiplier, gender_multiplier) = multipliers(definition, demographics);
    let mut modified = (base_score * age_multiplier * gender_multiplier).round();

    let required_minimum = definition.scoring.as_ref().and_then(|s| s.required_minimum);
    let minimum_met = required_minimum
        .map(|minimum| required_count >= minimum)
        .unwrap_or(true);
    if let Some(minimum) = required_minimum {
        if required_count < minimum {
            let penalty_per_item = definition
                .scoring
                .as_ref()
                .map(|s| s.required_penalty)
                .unwrap_or(50.0);
            modified -= f64::from(minimum - required_count) * penalty_per_item;
        }
    }

    let raw_score = modified.round() as i64;
    Ok(ScoreOutcome {
        questionnaire_id: definition.id.clone(),
        score: raw_score.max(0),
        raw_score,
        base_score,
        breakdown,
        question_count,
        required_count,
        minimum_met,
        age_multiplier,
        gender_multiplier,
    })
}

/// The global demographic multiplier pair: the questionnaire's own modifier
/// table when present, the engine-wide defaults otherwise. Brackets missing
/// from a declared table fall back to 1.
pub fn multipliers(
    definition: &QuestionnaireDefinition,
    demographics: &DemographicProfile,
) -> (f64, f64) {
    if let Some(table) = definition.scoring.as_ref().and_then(|s| s.modifiers.as_ref()) {
        let age = table
            .age
            .get(&demographics.age_bracket)
            .map(|entry| entry.multiplier)
            .unwrap_or(1.0);
        let gender = table
            .gender
            .get(&demographics.gender)
            .map(|entry| entry.multiplier)
            .unwrap_or(1.0);
        (age, gender)
    } else {
        (
            demographics.age_bracket.default_multiplier(),
            demographics.gender.default_multiplier(),
        )
    }
}

fn score_answer(
    record: &AnswerRecord,
    question: &Question,
    demographics: &DemographicProfile,
) -> f64 {
    match (question.kind, &record.answer) {
        (QuestionKind::Scale, AnswerValue::Scale(value)) => {
            let mut score = *value;
            if let Some(weights) = question
                .weights
                .as_ref()
                .and_then(|w| w.demographic.as_ref())
            {
                let age = weights
                    .age
                    .get(&demographics.age_bracket)
                    .copied()
                    .unwrap_or(1.0);
                let gender = weights
                    .gender
                    .get(&demographics.gender)
                    .copied()
                    .unwrap_or(1.0);
                score *= age * gender;
            }
            score
        }

        (QuestionKind::Single, AnswerValue::Single(value)) => question
            .options
            .iter()
            .find(|opt| opt.value == *value)
            .map(|opt| opt.weight)
            .unwrap_or(FALLBACK_SCORE),

        // Unknown selections contribute 0; options without an explicit
        // weight carry the parse-time default.
        (QuestionKind::Multiple, AnswerValue::Multiple(selected)) => selected
            .iter()
            .filter_map(|value| question.options.iter().find(|opt| opt.value == *value))
            .map(|opt| opt.weight)
            .sum(),

        _ => FALLBACK_SCORE,
    }
}

fn count_required(record: &AnswerRecord, question: &Question) -> u32 {
    match &record.answer {
        AnswerValue::Multiple(selected) => question
            .options
            .iter()
            .filter(|opt| opt.required && selected.contains(&opt.value))
            .count() as u32,
        AnswerValue::Single(value) => question
            .options
            .iter()
            .any(|opt| opt.required && opt.value == *value) as u32,
        _ => 0,
    }
}
