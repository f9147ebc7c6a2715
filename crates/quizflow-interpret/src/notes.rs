//! Personalized note assembly.
//!
//! Independent rules, each contributing zero or one note: requirement
//! status, age bracket, gender (plus declared risk factors), the first
//! matching occupation keyword, selected-trait analysis, and a score-banded
//! closing remark. A rule without a trigger contributes nothing — there is
//! no placeholder text.

use quizflow_core::demographics::{AgeBracket, DemographicProfile, GenderCategory};
use quizflow_core::model::{ModifierTable, QuestionnaireDefinition};
use quizflow_core::results::{AnswerValue, ScoreOutcome};

/// Occupation keywords scanned in priority order; the first match wins and
/// stops the scan.
const OCCUPATION_NOTES: &[(&str, &str)] = &[
    ("doctor", "medical work carries a high risk of emotional burnout"),
    ("teacher", "teaching comes with sustained emotional load"),
    ("developer", "IT work tends toward long hours and social isolation"),
    ("manager", "management roles concentrate responsibility and pressure"),
    ("student", "studying creates deadline and evaluation stressors of its own"),
];

/// Selected positive traits at or above this weight are called out as
/// especially valuable.
const HIGH_VALUE_WEIGHT: f64 = 25.0;
/// Selected negative traits at or below this weight are critical problems.
const CRITICAL_NEGATIVE_WEIGHT: f64 = -40.0;
/// Negative traits above this bound count as minor flaws.
const MINOR_NEGATIVE_FLOOR: f64 = -25.0;

/// Assemble the personalized notes for one outcome.
pub fn generate_notes(
    outcome: &ScoreOutcome,
    definition: &QuestionnaireDefinition,
    demographics: &DemographicProfile,
) -> Vec<String> {
    let mut notes = Vec::new();
    let modifiers = definition
        .scoring
        .as_ref()
        .and_then(|rules| rules.modifiers.as_ref());

    if definition
        .scoring
        .as_ref()
        .and_then(|rules| rules.required_minimum)
        .is_some()
    {
        notes.push(if outcome.minimum_met {
            "All mandatory requirements are met".to_string()
        } else {
            "Not all mandatory requirements for this result are met".to_string()
        });
    }

    notes.push(format!(
        "Age factors: {}",
        age_note(modifiers, demographics.age_bracket)
    ));
    notes.push(format!(
        "Individual factors: {}",
        gender_note(modifiers, demographics.gender)
    ));

    if let Some(risks) = gender_risks(modifiers, demographics.gender) {
        notes.push(format!("Risk factors: {}", risks.join(", ")));
    }

    if let Some(occupation) = &demographics.occupation {
        if let Some(note) = occupation_note(occupation) {
            notes.push(format!("Occupational factors: {note}"));
        }
    }

    notes.extend(trait_notes(outcome, definition));
    notes.push(closing_remark(outcome.score).to_string());
    notes
}

/// The definition's own note for the bracket when declared, the built-in
/// default otherwise.
fn age_note(modifiers: Option<&ModifierTable>, bracket: AgeBracket) -> String {
    modifiers
        .and_then(|table| table.age.get(&bracket))
        .and_then(|entry| entry.note.clone())
        .unwrap_or_else(|| builtin_age_note(bracket).to_string())
}

fn builtin_age_note(bracket: AgeBracket) -> &'static str {
    match bracket {
        AgeBracket::From18To25 => "younger years often come with adaptation stress",
        AgeBracket::From26To35 => "a period of active career growth and family building",
        AgeBracket::From36To45 => "the peak period of life demands",
        AgeBracket::From46To55 => "a period of rethinking priorities",
        AgeBracket::Over55 => "a more settled stage of life",
    }
}

fn gender_note(modifiers: Option<&ModifierTable>, gender: GenderCategory) -> String {
    modifiers
        .and_then(|table| table.gender.get(&gender))
        .and_then(|entry| entry.note.clone())
        .unwrap_or_else(|| builtin_gender_note(gender).to_string())
}

fn builtin_gender_note(gender: GenderCategory) -> &'static str {
    match gender {
        GenderCategory::Female => "emotional strain is reported more often in this group",
        GenderCategory::Male => {
            "strain is acknowledged less often here, while work burnout is more common"
        }
        GenderCategory::Other => "additional social stressors may apply",
    }
}

fn gender_risks(modifiers: Option<&ModifierTable>, gender: GenderCategory) -> Option<Vec<String>> {
    modifiers
        .and_then(|table| table.gender.get(&gender))
        .map(|entry| entry.specific_risks.clone())
        .filter(|risks| !risks.is_empty())
}

fn occupation_note(occupation: &str) -> Option<&'static str> {
    let occupation = occupation.to_lowercase();
    OCCUPATION_NOTES
        .iter()
        .find(|(keyword, _)| occupation.contains(keyword))
        .map(|(_, note)| *note)
}

/// Partition selected options of multiple-choice answers by weight
/// magnitude into especially valuable, critical, and minor groups.
fn trait_notes(outcome: &ScoreOutcome, definition: &QuestionnaireDefinition) -> Vec<String> {
    let mut valuable = Vec::new();
    let mut critical = Vec::new();
    let mut minor = Vec::new();

    for entry in &outcome.breakdown {
        let AnswerValue::Multiple(selected) = &entry.answer else {
            continue;
        };
        let Some(question) = definition.find_question(&entry.question_id) else {
            continue;
        };
        for opt in &question.options {
            if !selected.contains(&opt.value) {
                continue;
            }
            if opt.weight >= HIGH_VALUE_WEIGHT {
                valuable.push(opt.label.clone());
            } else if opt.weight <= CRITICAL_NEGATIVE_WEIGHT {
                critical.push(opt.label.clone());
            } else if opt.weight < 0.0 && opt.weight > MINOR_NEGATIVE_FLOOR {
                minor.push(opt.label.clone());
            }
        }
    }

    let mut notes = Vec::new();
    if !valuable.is_empty() {
        notes.push(format!("Especially valuable traits: {}", valuable.join(", ")));
    }
    if !critical.is_empty() {
        notes.push(format!("Critical problems: {}", critical.join(", ")));
    }
    if !minor.is_empty() {
        notes.push(format!("Minor flaws: {}", minor.join(", ")));
    }
    notes
}

fn closing_remark(score: i64) -> &'static str {
    if score >= 250 {
        "An outstanding overall result"
    } else if score >= 150 {
        "Solid potential; keep building on it"
    } else if score >= 50 {
        "A modest result; small consistent steps will move it"
    } else {
        "A difficult result; consider a change of course"
    }
}
