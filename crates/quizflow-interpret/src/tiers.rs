//! Tier selection and the required-minimum downgrade rule.

use quizflow_core::model::Tier;
use quizflow_core::results::Interpretation;

/// Tiers ordered best-first (descending threshold), regardless of their
/// declared order in the definition.
fn ordered_tiers(tiers: &[Tier]) -> Vec<&Tier> {
    let mut ordered: Vec<&Tier> = tiers.iter().collect();
    ordered.sort_by(|a, b| b.min.cmp(&a.min));
    ordered
}

/// Map a score onto a tier table.
///
/// Selection takes the highest-threshold tier whose `min` does not exceed
/// the score; a score below every threshold lands on the worst tier. When
/// `minimum_met` is false the selected tier is shifted two positions toward
/// the worst end, clamped there — a raw score alone overstates the result
/// when mandatory conditions are unmet.
///
/// Returns `None` only for an empty tier table.
pub fn interpret_tiers(tiers: &[Tier], score: i64, minimum_met: bool) -> Option<Interpretation> {
    let ordered = ordered_tiers(tiers);
    if ordered.is_empty() {
        return None;
    }

    let mut index = ordered
        .iter()
        .position(|tier| score >= tier.min)
        .unwrap_or(ordered.len() - 1);

    if !minimum_met {
        index = (index + 2).min(ordered.len() - 1);
    }

    let tier = ordered[index];
    let range_max = if index == 0 {
        None
    } else {
        Some(ordered[index - 1].min - 1)
    };

    Some(Interpretation {
        level: tier.level.clone(),
        label: tier.label.clone(),
        color: tier.color.clone(),
        description: tier.description.clone(),
        probability: tier.probability,
        range_min: tier.min,
        range_max,
        recommendations: tier.recommendations.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(level: &str, min: i64) -> Tier {
        Tier {
            level: level.into(),
            min,
            label: level.to_uppercase(),
            color: format!("#{min:06x}"),
            description: format!("{level} description"),
            probability: None,
            recommendations: vec![format!("{level} advice")],
        }
    }

    /// The seven-tier table from the relationship-style questionnaire.
    fn seven_tiers() -> Vec<Tier> {
        vec![
            tier("perfect", 300),
            tier("excellent", 250),
            tier("good", 200),
            tier("mixed", 150),
            tier("challenging", 100),
            tier("friends", 50),
            tier("runaway", 0),
        ]
    }

    #[test]
    fn every_score_maps_to_exactly_one_tier() {
        let tiers = seven_tiers();
        for score in 0..=400 {
            let interpretation = interpret_tiers(&tiers, score, true).unwrap();
            let min = interpretation.range_min;
            assert!(score >= min, "score {score} below tier min {min}");
            if let Some(max) = interpretation.range_max {
                assert!(score <= max, "score {score} above tier max {max}");
            }
        }
    }

    #[test]
    fn boundary_scores_select_expected_tiers() {
        let tiers = seven_tiers();
        assert_eq!(interpret_tiers(&tiers, 0, true).unwrap().level, "runaway");
        assert_eq!(interpret_tiers(&tiers, 49, true).unwrap().level, "runaway");
        assert_eq!(interpret_tiers(&tiers, 50, true).unwrap().level, "friends");
        assert_eq!(interpret_tiers(&tiers, 299, true).unwrap().level, "excellent");
        assert_eq!(interpret_tiers(&tiers, 300, true).unwrap().level, "perfect");
        assert_eq!(interpret_tiers(&tiers, 9000, true).unwrap().level, "perfect");
    }

    #[test]
    fn implicit_range_max_is_next_threshold_minus_one() {
        let tiers = seven_tiers();
        let good = interpret_tiers(&tiers, 210, true).unwrap();
        assert_eq!(good.range_min, 200);
        assert_eq!(good.range_max, Some(249));

        let top = interpret_tiers(&tiers, 350, true).unwrap();
        assert_eq!(top.range_max, None);
    }

    #[test]
    fn unmet_minimum_downgrades_two_tiers() {
        let tiers = seven_tiers();
        // 300 would be "perfect"; the downgrade lands on "good".
        let downgraded = interpret_tiers(&tiers, 300, false).unwrap();
        assert_eq!(downgraded.level, "good");
    }

    #[test]
    fn downgrade_clamps_at_worst_tier() {
        let tiers = seven_tiers();
        // Second-worst ("friends") downgrades to the worst, never past it.
        let from_second_worst = interpret_tiers(&tiers, 60, false).unwrap();
        assert_eq!(from_second_worst.level, "runaway");

        let from_worst = interpret_tiers(&tiers, 10, false).unwrap();
        assert_eq!(from_worst.level, "runaway");
    }

    #[test]
    fn declared_order_does_not_matter() {
        let mut tiers = seven_tiers();
        tiers.reverse();
        assert_eq!(interpret_tiers(&tiers, 220, true).unwrap().level, "good");
    }

    #[test]
    fn recommendations_follow_tier_identity() {
        let tiers = seven_tiers();
        let interpretation = interpret_tiers(&tiers, 120, true).unwrap();
        assert_eq!(interpretation.recommendations, vec!["challenging advice"]);
    }

    #[test]
    fn empty_table_yields_none() {
        assert!(interpret_tiers(&[], 10, true).is_none());
    }
}
