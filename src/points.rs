// Point budgets: what a character has spent out of what its priorities grant.
use std::collections::BTreeMap;

use crate::catalog::{AttributeBounds, AttributeMeta};

const ATTRIBUTE_WEIGHT: f64 = 33.0;
const SKILL_WEIGHT: f64 = 33.0;
const SPECIAL_WEIGHT: f64 = 20.0;
const SAVED_BONUS: f64 = 14.0;

/// Points bought above each attribute's starting value.
///
/// The starting value is the metatype minimum when `bounds` has one, else the
/// attribute's declared minimum, else 1. Attributes without a current value
/// sit at that minimum and cost nothing.
pub fn calculate_attribute_points_spent(
    attributes: &BTreeMap<String, i32>,
    meta: &[AttributeMeta],
    bounds: Option<&BTreeMap<String, AttributeBounds>>,
) -> i32 {
    meta.iter()
        .map(|attribute| {
            let effective_min = bounds
                .and_then(|bounds| bounds.get(&attribute.id))
                .map(|bounds| bounds.min)
                .or(attribute.min)
                .unwrap_or(1);
            let current = attributes
                .get(&attribute.id)
                .copied()
                .unwrap_or(effective_min);
            (current - effective_min).max(0)
        })
        .sum()
}

/// Skill ratings plus a flat point for every specialization.
pub fn calculate_skill_points_spent(
    skills: &BTreeMap<String, i32>,
    specializations: &BTreeMap<String, Vec<String>>,
) -> i32 {
    let ratings: i32 = skills.values().sum();
    let specs: usize = specializations.values().map(Vec::len).sum();
    ratings + specs as i32
}

// Non-positive entries are skipped, never subtracted.
pub fn calculate_special_points_spent(special: &BTreeMap<String, i32>) -> i32 {
    special.values().filter(|value| **value > 0).sum()
}

fn fill_ratio(total: i32, remaining: i32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total - remaining) as f64 / total as f64
}

/// Weighted progress through character creation, 0 to 100.
pub fn calculate_completion_percent(
    attr_total: i32,
    attr_remaining: i32,
    skill_total: i32,
    skill_remaining: i32,
    special_total: i32,
    special_remaining: i32,
    is_saved: bool,
) -> i32 {
    let saved = if is_saved { SAVED_BONUS } else { 0.0 };
    let percent = fill_ratio(attr_total, attr_remaining) * ATTRIBUTE_WEIGHT
        + fill_ratio(skill_total, skill_remaining) * SKILL_WEIGHT
        + fill_ratio(special_total, special_remaining) * SPECIAL_WEIGHT
        + saved;
    (percent.round() as i32).clamp(0, 100)
}
