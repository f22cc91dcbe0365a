// src/domain/achievement.rs

use std::collections::HashSet;

use crate::models::{achievement::Achievement, points::PointsProfile};

/// Reads the profile counter a rule is keyed on. Unknown requirement
/// types yield `None`, so such rules never match (and never panic).
fn counter_for(profile: &PointsProfile, requirement_type: &str) -> Option<i64> {
    match requirement_type {
        "total_points" => Some(profile.total_points),
        "correct_answers" => Some(profile.correct_answers),
        "total_answers" => Some(profile.total_answers),
        "streak_days" => Some(profile.streak_days),
        _ => None,
    }
}

/// Returns every catalog rule the profile now satisfies that has not
/// been granted yet. Multiple thresholds may cross in a single update,
/// so all matches are returned, in catalog order.
///
/// The matcher holds no state: idempotence across calls depends on the
/// caller persisting grants into `already_granted` before re-evaluating.
pub fn find_newly_unlocked<'a>(
    profile: &PointsProfile,
    already_granted: &HashSet<i64>,
    catalog: &'a [Achievement],
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|rule| !already_granted.contains(&rule.id))
        .filter(|rule| {
            counter_for(profile, &rule.requirement_type)
                .is_some_and(|current| current >= rule.requirement_value)
        })
        .collect()
}

/// The profile counter a rule is keyed on, zero for unknown types.
/// Used for the "current / required" caption next to progress bars.
pub fn counter_value(profile: &PointsProfile, rule: &Achievement) -> i64 {
    counter_for(profile, &rule.requirement_type).unwrap_or(0)
}

/// Fraction of the requirement reached, clamped to [0, 1] so overshoot
/// never renders a progress bar past full.
pub fn progress_fraction(profile: &PointsProfile, rule: &Achievement) -> f64 {
    if rule.requirement_value <= 0 {
        return 1.0;
    }
    let current = counter_for(profile, &rule.requirement_type).unwrap_or(0);
    (current as f64 / rule.requirement_value as f64).clamp(0.0, 1.0)
}
