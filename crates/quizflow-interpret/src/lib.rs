//! quizflow-interpret — turns scoring outcomes into human-readable results.
//!
//! Questionnaires that declare a tier table get config-driven tier
//! selection (with the required-minimum downgrade rule); everything else
//! falls back to the universal interpreter, which never fails.

pub mod notes;
pub mod tiers;
pub mod universal;

use quizflow_core::demographics::DemographicProfile;
use quizflow_core::model::QuestionnaireDefinition;
use quizflow_core::results::{Interpretation, ScoreOutcome};
use quizflow_core::traits::Interpreter;

/// The default interpreter wired into the run engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardInterpreter;

impl Interpreter for StandardInterpreter {
    fn interpret(
        &self,
        outcome: &ScoreOutcome,
        definition: &QuestionnaireDefinition,
        _demographics: &DemographicProfile,
    ) -> Interpretation {
        tiers::interpret_tiers(&definition.tiers, outcome.score, outcome.minimum_met)
            .unwrap_or_else(|| universal::interpret_universal(&definition.id, outcome.score))
    }

    fn personalized_notes(
        &self,
        outcome: &ScoreOutcome,
        definition: &QuestionnaireDefinition,
        demographics: &DemographicProfile,
    ) -> Vec<String> {
        notes::generate_notes(outcome, definition, demographics)
    }
}
