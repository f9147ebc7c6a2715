//! The live state of one questionnaire run.
//!
//! A session owns the active sequence, the cursor, and the answer set, and
//! is held by exactly one logical caller; nothing here is shared or global.

use std::sync::Arc;

use chrono::Utc;

use crate::error::EngineError;
use crate::flow;
use crate::model::{Question, QuestionnaireDefinition};
use crate::results::{AnswerRecord, AnswerSet, AnswerValue, RunProgress};

/// What happened when the session advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the next question in the sequence.
    Advanced,
    /// The last question was answered and nothing follows.
    Completed,
}

/// The mutable state of a single run: active sequence, cursor, answers.
#[derive(Debug, Clone)]
pub struct RunSession {
    definition: Arc<QuestionnaireDefinition>,
    sequence: Vec<Question>,
    cursor: usize,
    answers: AnswerSet,
}

impl RunSession {
    /// Seed a session from the definition's initial questions.
    pub fn new(definition: Arc<QuestionnaireDefinition>) -> Self {
        let sequence = definition.initial_questions.clone();
        Self {
            definition,
            sequence,
            cursor: 0,
            answers: AnswerSet::new(),
        }
    }

    /// Restore a session from a saved progress snapshot.
    pub fn restore(definition: Arc<QuestionnaireDefinition>, progress: RunProgress) -> Self {
        let cursor = progress
            .cursor
            .min(progress.active_sequence.len().saturating_sub(1));
        Self {
            definition,
            sequence: progress.active_sequence,
            cursor,
            answers: progress.answers,
        }
    }

    pub fn definition(&self) -> &QuestionnaireDefinition {
        &self.definition
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.sequence.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Progress in percent, capped at 95 until the run actually completes.
    pub fn progress_percent(&self) -> u8 {
        if self.sequence.is_empty() {
            return 0;
        }
        let percent =
            ((self.cursor + 1) as f64 / self.sequence.len() as f64 * 100.0).round() as u8;
        percent.min(95)
    }

    /// Record the answer for the current question, overwriting any earlier
    /// answer for the same question id.
    pub fn submit_answer(&mut self, answer: AnswerValue) -> Result<(), EngineError> {
        let question = self
            .current_question()
            .ok_or(EngineError::NoCurrentQuestion)?;
        self.answers.insert(AnswerRecord {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            answer,
            timestamp: Utc::now(),
            kind: question.kind,
        });
        Ok(())
    }

    /// The saved answer for the current question, if any.
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.current_question()
            .and_then(|q| self.answers.get(&q.id))
    }

    /// True when the current question has a non-empty answer.
    pub fn is_current_answered(&self) -> bool {
        self.current_answer()
            .map(|record| !record.answer.is_empty())
            .unwrap_or(false)
    }

    /// Whether the current question is the last one.
    ///
    /// Recomputed from the current answer on every call, never cached: the
    /// answer can change between queries, and the same computation must back
    /// both a "finish" control and an independent completion query.
    pub fn is_last_question(&self) -> bool {
        if self.cursor + 1 < self.sequence.len() {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        match self.answers.get(&question.id) {
            Some(record) if !record.answer.is_empty() => {
                flow::next_group(question, &record.answer, &self.definition).is_empty()
            }
            _ => false,
        }
    }

    /// Advance to the next question, splicing in any follow-up group.
    ///
    /// The current question must have a non-empty answer; advancing without
    /// one is a contract violation and is rejected.
    pub fn go_next(&mut self) -> Result<StepOutcome, EngineError> {
        let question = self
            .current_question()
            .ok_or(EngineError::NoCurrentQuestion)?
            .clone();
        let record = self
            .answers
            .get(&question.id)
            .filter(|record| !record.answer.is_empty())
            .ok_or_else(|| EngineError::Unanswered(question.id.clone()))?
            .clone();

        let next = flow::next_group(&question, &record.answer, &self.definition).to_vec();
        if flow::advance(&mut self.sequence, &mut self.cursor, &next) {
            Ok(StepOutcome::Completed)
        } else {
            Ok(StepOutcome::Advanced)
        }
    }

    /// Step back one question. Returns `false` at the start of the sequence.
    ///
    /// Flow recomputation only happens going forward: questions already
    /// spliced in by a previous answer stay in the sequence even if that
    /// answer later changes.
    pub fn go_previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Clear all answers and reseed the sequence for a fresh attempt.
    pub fn restart(&mut self) {
        self.sequence = self.definition.initial_questions.clone();
        self.cursor = 0;
        self.answers.clear();
    }

    /// Snapshot for progress persistence.
    pub fn snapshot(&self) -> RunProgress {
        RunProgress {
            cursor: self.cursor,
            active_sequence: self.sequence.clone(),
            answers: self.answers.clone(),
        }
    }
}
