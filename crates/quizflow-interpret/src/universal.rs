//! Fallback interpretation for questionnaires without a tier table.
//!
//! Classifies by an id heuristic first, then by inferred score range, and
//! resolves anything unrecognized to a neutral "result processed"
//! interpretation. This path must never fail.

use quizflow_core::results::Interpretation;

/// What kind of result a tier-less questionnaire appears to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Stress,
    Compatibility,
    Personality,
    Depression,
    Anxiety,
    Intelligence,
    /// Score in 0–100, read as a percentage.
    Percentage,
    /// Score in 0–200, read as a doubled percentage scale.
    DoubledScale,
    Generic,
}

/// Infer the result kind from the questionnaire id, falling back to the
/// score range.
pub fn detect_kind(questionnaire_id: &str, score: i64) -> ResultKind {
    let id = questionnaire_id.to_lowercase();
    if id.contains("stress") || id.contains("burnout") {
        ResultKind::Stress
    } else if id.contains("readiness") || id.contains("compatibility") {
        ResultKind::Compatibility
    } else if id.contains("personality") {
        ResultKind::Personality
    } else if id.contains("depression") {
        ResultKind::Depression
    } else if id.contains("anxiety") {
        ResultKind::Anxiety
    } else if id.contains("iq") {
        ResultKind::Intelligence
    } else if (0..=100).contains(&score) {
        ResultKind::Percentage
    } else if (0..=200).contains(&score) {
        ResultKind::DoubledScale
    } else {
        ResultKind::Generic
    }
}

/// Interpret a score without a tier table. Total: every input resolves to
/// some interpretation.
pub fn interpret_universal(questionnaire_id: &str, score: i64) -> Interpretation {
    match detect_kind(questionnaire_id, score) {
        ResultKind::Stress => interpret_stress(score),
        ResultKind::Compatibility => interpret_compatibility(score),
        ResultKind::Personality => band(
            "personality",
            "Personality profile",
            "#6366f1",
            "The result reflects individual personality traits.",
            0,
            None,
            None,
        ),
        ResultKind::Depression => interpret_depression(score),
        ResultKind::Anxiety => interpret_anxiety(score),
        ResultKind::Intelligence => interpret_intelligence(score),
        ResultKind::Percentage => interpret_percentage(score),
        ResultKind::DoubledScale => {
            // Fold the doubled scale back onto percentage bands.
            interpret_percentage((score as f64 / 200.0 * 100.0).round() as i64)
        }
        ResultKind::Generic => band(
            "generic",
            "Result processed",
            "#6366f1",
            "The result was computed and recorded.",
            0,
            None,
            None,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn band(
    level: &str,
    label: &str,
    color: &str,
    description: &str,
    range_min: i64,
    range_max: Option<i64>,
    probability: Option<u8>,
) -> Interpretation {
    Interpretation {
        level: level.into(),
        label: label.into(),
        color: color.into(),
        description: description.into(),
        probability,
        range_min,
        range_max,
        recommendations: vec![],
    }
}

fn interpret_stress(score: i64) -> Interpretation {
    if score <= 12 {
        band(
            "minimal",
            "Minimal stress level",
            "#10b981",
            "Stress is within a healthy range; current coping is working.",
            0,
            Some(12),
            None,
        )
    } else if score <= 25 {
        band(
            "mild",
            "Mild stress level",
            "#f59e0b",
            "Some signs of stress are present but not yet critical.",
            13,
            Some(25),
            None,
        )
    } else if score <= 40 {
        band(
            "moderate",
            "Moderate stress level",
            "#ea580c",
            "Stress is starting to affect daily life; active measures are advisable.",
            26,
            Some(40),
            None,
        )
    } else if score <= 55 {
        band(
            "high",
            "High stress level",
            "#dc2626",
            "A significant stress load that needs prompt attention.",
            41,
            Some(55),
            None,
        )
    } else {
        band(
            "critical",
            "Critical stress level",
            "#991b1b",
            "A critically high stress load; professional support is strongly advised.",
            56,
            None,
            None,
        )
    }
}

fn interpret_compatibility(score: i64) -> Interpretation {
    let probability = |cap: i64| Some(score.clamp(0, cap).min(100) as u8);
    if score >= 80 {
        band(
            "excellent",
            "Excellent compatibility",
            "#10b981",
            "All the ingredients for a balanced relationship are present.",
            80,
            None,
            probability(95),
        )
    } else if score >= 60 {
        band(
            "promising",
            "Good prospects",
            "#f59e0b",
            "There is solid potential to build on.",
            60,
            Some(79),
            probability(75),
        )
    } else if score >= 40 {
        band(
            "developing",
            "Room to grow",
            "#ea580c",
            "Good qualities are present, with clear areas to develop.",
            40,
            Some(59),
            probability(50),
        )
    } else {
        band(
            "not_ready",
            "Not ready yet",
            "#dc2626",
            "More groundwork is needed before a serious commitment.",
            0,
            Some(39),
            probability(30),
        )
    }
}

fn interpret_depression(score: i64) -> Interpretation {
    if score <= 10 {
        band(
            "normal",
            "Stable mood",
            "#10b981",
            "No signs of depression detected.",
            0,
            Some(10),
            None,
        )
    } else if score <= 20 {
        band(
            "mild",
            "Mild low mood",
            "#f59e0b",
            "Some depressive symptoms are present.",
            11,
            Some(20),
            None,
        )
    } else {
        band(
            "pronounced",
            "Pronounced low mood",
            "#dc2626",
            "Professional consultation is recommended.",
            21,
            None,
            None,
        )
    }
}

fn interpret_anxiety(score: i64) -> Interpretation {
    if score <= 15 {
        band(
            "low",
            "Low anxiety",
            "#10b981",
            "Anxiety is within the normal range.",
            0,
            Some(15),
            None,
        )
    } else if score <= 30 {
        band(
            "moderate",
            "Moderate anxiety",
            "#f59e0b",
            "Some signs of elevated anxiety.",
            16,
            Some(30),
            None,
        )
    } else {
        band(
            "high",
            "High anxiety",
            "#dc2626",
            "Seeking support is recommended.",
            31,
            None,
            None,
        )
    }
}

fn interpret_intelligence(score: i64) -> Interpretation {
    if score >= 130 {
        band(
            "high",
            "Well above average",
            "#6366f1",
            "The result is significantly above the mean.",
            130,
            None,
            None,
        )
    } else if score >= 115 {
        band(
            "above_average",
            "Above average",
            "#10b981",
            "The result is above the mean.",
            115,
            Some(129),
            None,
        )
    } else if score >= 85 {
        band(
            "average",
            "Average",
            "#f59e0b",
            "The result matches the mean range.",
            85,
            Some(114),
            None,
        )
    } else {
        band(
            "below_average",
            "Below average",
            "#ea580c",
            "Cognitive training may help.",
            0,
            Some(84),
            None,
        )
    }
}

fn interpret_percentage(score: i64) -> Interpretation {
    if score >= 80 {
        band(
            "excellent",
            "Excellent result",
            "#10b981",
            "Well above the average range.",
            80,
            None,
            None,
        )
    } else if score >= 60 {
        band(
            "good",
            "Good result",
            "#f59e0b",
            "Above the average range.",
            60,
            Some(79),
            None,
        )
    } else if score >= 40 {
        band(
            "average",
            "Average result",
            "#ea580c",
            "Within the average range.",
            40,
            Some(59),
            None,
        )
    } else {
        band(
            "needs_work",
            "Room for improvement",
            "#dc2626",
            "Focused attention on this area is worthwhile.",
            0,
            Some(39),
            None,
        )
    }
}
