//! Flow decisions: which questions come next, and when a run is complete.
//!
//! Both functions here are pure. `next_group` is re-evaluated at the moment
//! of advancing (and again for every "is this the last question" query), so
//! a changed answer is always reflected without any cached state.

use crate::model::{Question, QuestionKind, QuestionnaireDefinition, ScaleCondition};
use crate::results::AnswerValue;

/// Determine the follow-up group for an answered question.
///
/// Returns an empty slice when no branching rule selects a flow, including
/// for dangling flow keys and for answer shapes that do not match the
/// question kind.
pub fn next_group<'a>(
    question: &Question,
    answer: &AnswerValue,
    definition: &'a QuestionnaireDefinition,
) -> &'a [Question] {
    match (question.kind, answer) {
        (QuestionKind::Single, AnswerValue::Single(value)) => question
            .options
            .iter()
            .find(|opt| opt.value == *value)
            .and_then(|opt| opt.next_flow.as_deref())
            .map(|key| definition.flow(key))
            .unwrap_or(&[]),

        // First condition in declared order wins; a later condition that
        // would also match never overrides an earlier one.
        (QuestionKind::Scale, AnswerValue::Scale(value)) => question
            .conditions
            .iter()
            .find(|cond| condition_met(cond, *value))
            .map(|cond| definition.flow(&cond.next_flow))
            .unwrap_or(&[]),

        (QuestionKind::Multiple, AnswerValue::Multiple(selected)) => {
            // Strictly greatest positive weight among the selected options
            // that declare a flow; ties keep the first in option order.
            let mut best_weight = 0.0;
            let mut best_flow = None;
            for opt in &question.options {
                if !selected.contains(&opt.value) {
                    continue;
                }
                if let Some(flow) = opt.next_flow.as_deref() {
                    if opt.weight > best_weight {
                        best_weight = opt.weight;
                        best_flow = Some(flow);
                    }
                }
            }
            best_flow.map(|key| definition.flow(key)).unwrap_or(&[])
        }

        _ => &[],
    }
}

fn condition_met(cond: &ScaleCondition, value: f64) -> bool {
    match (cond.min, cond.max) {
        (Some(min), Some(max)) => value >= min && value <= max,
        (Some(min), None) => value >= min,
        (None, Some(max)) => value <= max,
        // A condition without bounds never matches.
        (None, None) => false,
    }
}

/// Splice the follow-up group into the sequence immediately after the
/// cursor and advance by one.
///
/// Returns `true` when the run is complete: the cursor sits at the last
/// position and there is nothing to insert. On completion the cursor does
/// not advance further.
pub fn advance(sequence: &mut Vec<Question>, cursor: &mut usize, next: &[Question]) -> bool {
    if *cursor + 1 >= sequence.len() && next.is_empty() {
        return true;
    }
    if !next.is_empty() {
        let insert_at = *cursor + 1;
        sequence.splice(insert_at..insert_at, next.iter().cloned());
    }
    *cursor += 1;
    false
}
