// Formulas deriving game statistics and resource costs from a character's selections.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::catalog::{ChargenConstData, ItemMeta};
use crate::state::{AugmentGrade, AugmentSelection, DroneSelection, GearSelection};

/// Essence every character starts with.
pub const BASE_ESSENCE: f64 = 6.0;

const BIOCOMPATIBILITY_ESSENCE_MULTIPLIER: f64 = 0.9;

fn ceil_third(total: i32) -> i32 {
    (total as f64 / 3.0).ceil() as i32
}

fn ceil_half(value: i32) -> i32 {
    (value as f64 / 2.0).ceil() as i32
}

pub fn calculate_physical_limit(strength: i32, body: i32, reaction: i32) -> i32 {
    ceil_third(strength * 2 + body + reaction)
}

pub fn calculate_mental_limit(logic: i32, intuition: i32, willpower: i32) -> i32 {
    ceil_third(logic * 2 + intuition + willpower)
}

// Essence is floored before it joins the sum, not after the division.
pub fn calculate_social_limit(charisma: i32, willpower: i32, essence: f64) -> i32 {
    ceil_third(charisma * 2 + willpower + essence.floor() as i32)
}

pub fn calculate_physical_cm(body: i32) -> i32 {
    8 + ceil_half(body)
}

pub fn calculate_stun_cm(willpower: i32) -> i32 {
    8 + ceil_half(willpower)
}

// Attribute values feeding the derived statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeInputs {
    pub body: i32,
    pub agility: i32,
    pub reaction: i32,
    pub strength: i32,
    pub willpower: i32,
    pub logic: i32,
    pub intuition: i32,
    pub charisma: i32,
    #[serde(default)]
    pub essence: Option<f64>, // Falls back to BASE_ESSENCE.
}

impl Default for AttributeInputs {
    fn default() -> Self {
        AttributeInputs {
            body: 1,
            agility: 1,
            reaction: 1,
            strength: 1,
            willpower: 1,
            logic: 1,
            intuition: 1,
            charisma: 1,
            essence: None,
        }
    }
}

impl AttributeInputs {
    /// Reads the core attributes out of an attribute map; missing entries sit
    /// at the default minimum of 1.
    pub fn from_attributes(attributes: &BTreeMap<String, i32>, essence: Option<f64>) -> Self {
        let get = |id: &str| attributes.get(id).copied().unwrap_or(1);
        AttributeInputs {
            body: get("body"),
            agility: get("agility"),
            reaction: get("reaction"),
            strength: get("strength"),
            willpower: get("willpower"),
            logic: get("logic"),
            intuition: get("intuition"),
            charisma: get("charisma"),
            essence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub physical_limit: i32,
    pub mental_limit: i32,
    pub social_limit: i32,
    pub physical_cm: i32,
    pub stun_cm: i32,
    pub composure: i32,
    pub judge_intentions: i32,
    pub memory: i32,
    pub lift_carry: i32,
    pub initiative: i32,
}

pub fn calculate_derived_stats(attrs: &AttributeInputs) -> DerivedStats {
    let essence = attrs.essence.unwrap_or(BASE_ESSENCE);
    DerivedStats {
        physical_limit: calculate_physical_limit(attrs.strength, attrs.body, attrs.reaction),
        mental_limit: calculate_mental_limit(attrs.logic, attrs.intuition, attrs.willpower),
        social_limit: calculate_social_limit(attrs.charisma, attrs.willpower, essence),
        physical_cm: calculate_physical_cm(attrs.body),
        stun_cm: calculate_stun_cm(attrs.willpower),
        composure: attrs.charisma + attrs.willpower,
        judge_intentions: attrs.charisma + attrs.intuition,
        memory: attrs.logic + attrs.willpower,
        lift_carry: attrs.strength + attrs.body,
        initiative: attrs.reaction + attrs.intuition,
    }
}

pub fn grade_essence_multiplier(grade: &str) -> f64 {
    AugmentGrade::from_str(grade)
        .map(AugmentGrade::essence_multiplier)
        .unwrap_or(1.0)
}

pub fn grade_cost_multiplier(grade: &str) -> f64 {
    AugmentGrade::from_str(grade)
        .map(AugmentGrade::cost_multiplier)
        .unwrap_or(1.0)
}

pub fn calculate_augment_essence_cost(
    base_essence: f64,
    grade: &str,
    has_biocompatibility: bool,
) -> f64 {
    let bio = if has_biocompatibility {
        BIOCOMPATIBILITY_ESSENCE_MULTIPLIER
    } else {
        1.0
    };
    base_essence * grade_essence_multiplier(grade) * bio
}

/// Nuyen for one augment. Attribute upgrades are only charged on cyberlimbs,
/// at `upgrade_cost` per point (see `DEFAULT_CYBERLIMB_UPGRADE_COST`).
pub fn calculate_augment_nuyen_cost(
    base_cost: f64,
    grade: &str,
    is_cyberlimb: bool,
    agi_upgrade: i32,
    str_upgrade: i32,
    upgrade_cost: f64,
) -> f64 {
    let upgrades = if is_cyberlimb {
        (agi_upgrade + str_upgrade) as f64 * upgrade_cost
    } else {
        0.0
    };
    base_cost * grade_cost_multiplier(grade) + upgrades
}

/// Folds a list of ids against a catalog. Ids the catalog no longer knows
/// cost nothing.
pub fn sum_catalog_costs<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    catalog: &BTreeMap<String, ItemMeta>,
) -> f64 {
    ids.into_iter()
        .map(|id| match catalog.get(id) {
            Some(item) => item.cost,
            None => {
                log::debug!("No catalog entry for {id}, counting it as free");
                0.0
            }
        })
        .sum()
}

pub fn calculate_gear_cost(gear: &[GearSelection], catalog: &BTreeMap<String, ItemMeta>) -> f64 {
    gear.iter()
        .map(|item| sum_catalog_costs([item.id.as_str()], catalog) * item.quantity as f64)
        .sum()
}

pub fn calculate_drone_cost(
    drones: &BTreeMap<String, DroneSelection>,
    drone_catalog: &BTreeMap<String, ItemMeta>,
    mod_catalog: &BTreeMap<String, ItemMeta>,
) -> f64 {
    drones
        .iter()
        .map(|(id, selection)| {
            sum_catalog_costs([id.as_str()], drone_catalog)
                + sum_catalog_costs(selection.mods.iter().map(String::as_str), mod_catalog)
        })
        .sum()
}

pub fn calculate_lifestyle_cost(lifestyle: &str, catalog: &BTreeMap<String, ItemMeta>) -> f64 {
    if lifestyle.is_empty() {
        return 0.0;
    }
    sum_catalog_costs([lifestyle], catalog)
}

pub fn calculate_augments_essence(
    augments: &BTreeMap<String, AugmentSelection>,
    catalog: &ChargenConstData,
    has_biocompatibility: bool,
) -> f64 {
    augments
        .values()
        .filter_map(|selection| {
            let meta = catalog.augments.get(&selection.id)?;
            Some(calculate_augment_essence_cost(
                meta.essence,
                &selection.grade,
                has_biocompatibility,
            ))
        })
        .sum()
}

pub fn calculate_augments_nuyen(
    augments: &BTreeMap<String, AugmentSelection>,
    catalog: &ChargenConstData,
) -> f64 {
    augments
        .values()
        .map(|selection| {
            let Some(meta) = catalog.augments.get(&selection.id) else {
                log::debug!("Unknown augment {}, counting it as free", selection.id);
                return 0.0;
            };
            let base = calculate_augment_nuyen_cost(
                meta.cost,
                &selection.grade,
                meta.is_cyberlimb,
                selection.agi_upgrade.unwrap_or(0),
                selection.str_upgrade.unwrap_or(0),
                catalog.cyberlimb_upgrade_cost,
            );
            base + sum_catalog_costs(
                selection.mods.iter().map(String::as_str),
                &catalog.augment_mods,
            )
        })
        .sum()
}
