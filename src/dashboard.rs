// Aggregated budget summary, recomputed from scratch on every state change.
use serde::{Deserialize, Serialize};

use crate::calculations::{
    BASE_ESSENCE, calculate_augments_essence, calculate_augments_nuyen, calculate_drone_cost,
    calculate_gear_cost, calculate_lifestyle_cost,
};
use crate::catalog::ChargenConstData;
use crate::points::{
    calculate_attribute_points_spent, calculate_completion_percent, calculate_skill_points_spent,
    calculate_special_points_spent,
};
use crate::state::{ChargenState, PriorityCategory};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub attr_total: i32,
    pub attr_spent: i32,
    pub attr_remaining: i32,

    pub skill_total: i32,
    pub skill_spent: i32,
    pub skill_remaining: i32,

    pub special_total: i32,
    pub special_spent: i32,
    pub special_remaining: i32,

    pub nuyen_total: i64,
    pub augment_nuyen: i64,
    pub drone_nuyen: i64,
    pub gear_nuyen: i64,
    pub lifestyle_nuyen: i64,
    pub nuyen_spent: i64,
    pub nuyen_remaining: i64,

    pub essence_total: f64,
    pub essence_spent: f64,
    pub essence_remaining: f64,

    pub has_biocompatibility: bool,
}

// Essence is tracked to two decimals, like on the character sheet.
fn round_essence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl DashboardData {
    pub fn compute(state: &ChargenState, catalog: &ChargenConstData) -> Self {
        let row = |category| {
            state
                .priority(category)
                .and_then(|letter| catalog.priority_row(letter))
        };

        let attr_total = row(PriorityCategory::Attributes)
            .map(|row| row.attributes)
            .unwrap_or(0);
        let skill_total = row(PriorityCategory::Skills)
            .map(|row| row.skills)
            .unwrap_or(0);
        let special_total = row(PriorityCategory::Metatype)
            .and_then(|row| row.special.get(&state.metatype_species.to_lowercase()))
            .copied()
            .unwrap_or(0);
        let nuyen_total = row(PriorityCategory::Resources)
            .map(|row| row.resources.round() as i64)
            .unwrap_or(0);

        let attr_spent = calculate_attribute_points_spent(
            &state.attributes,
            &catalog.attributes,
            catalog.bounds_for(&state.metatype_species),
        );
        let skill_spent = calculate_skill_points_spent(&state.skills, &state.skill_specializations);
        let special_spent = calculate_special_points_spent(&state.special);

        let has_biocompatibility = state.has_biocompatibility();
        let augment_nuyen = calculate_augments_nuyen(&state.augments, catalog).round() as i64;
        let drone_nuyen =
            calculate_drone_cost(&state.drones, &catalog.drones, &catalog.drone_mods).round() as i64;
        let gear_nuyen = calculate_gear_cost(&state.gear, &catalog.gear).round() as i64;
        let lifestyle_nuyen =
            calculate_lifestyle_cost(&state.lifestyle, &catalog.lifestyles).round() as i64;
        let nuyen_spent = augment_nuyen + drone_nuyen + gear_nuyen + lifestyle_nuyen;

        let essence_spent = round_essence(calculate_augments_essence(
            &state.augments,
            catalog,
            has_biocompatibility,
        ));

        DashboardData {
            attr_total,
            attr_spent,
            attr_remaining: attr_total - attr_spent,
            skill_total,
            skill_spent,
            skill_remaining: skill_total - skill_spent,
            special_total,
            special_spent,
            special_remaining: special_total - special_spent,
            nuyen_total,
            augment_nuyen,
            drone_nuyen,
            gear_nuyen,
            lifestyle_nuyen,
            nuyen_spent,
            nuyen_remaining: nuyen_total - nuyen_spent,
            essence_total: BASE_ESSENCE,
            essence_spent,
            essence_remaining: round_essence(BASE_ESSENCE - essence_spent),
            has_biocompatibility,
        }
    }

    pub fn completion_percent(&self, is_saved: bool) -> i32 {
        calculate_completion_percent(
            self.attr_total,
            self.attr_remaining,
            self.skill_total,
            self.skill_remaining,
            self.special_total,
            self.special_remaining,
            is_saved,
        )
    }
}
