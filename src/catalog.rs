//! Read-only lookup tables sent alongside the character state.
//!
//! The server owns these catalogs and may change them after a character was
//! created, so every lookup is an `Option` and callers treat a miss as a
//! neutral value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::state::PriorityLetter;

pub const DEFAULT_CYBERLIMB_UPGRADE_COST: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

impl AttributeMeta {
    fn core(id: &str, name: &str) -> Self {
        AttributeMeta {
            id: id.to_string(),
            name: name.to_string(),
            min: Some(1),
            max: Some(6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for AttributeBounds {
    fn default() -> Self {
        AttributeBounds { min: 1, max: 6 }
    }
}

impl AttributeBounds {
    pub fn new(min: i32, max: i32) -> Self {
        AttributeBounds { min, max }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max.max(self.min))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentMeta {
    pub id: String,
    pub name: String,
    pub essence: f64,
    pub cost: f64,
    #[serde(default)]
    pub is_cyberlimb: bool,
    #[serde(default)]
    pub category: String,
}

// Anything bought with nuyen and nothing else: gear, drones, mods, lifestyles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    pub id: String,
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityRow {
    pub attributes: i32,
    pub skills: i32,
    pub resources: f64,
    /// Special attribute points per metatype; metatypes missing here are not
    /// available at this priority.
    pub special: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargenConstData {
    pub attributes: Vec<AttributeMeta>,
    pub metatype_bounds: BTreeMap<String, BTreeMap<String, AttributeBounds>>,
    pub priority_table: BTreeMap<PriorityLetter, PriorityRow>,
    pub augments: BTreeMap<String, AugmentMeta>,
    pub augment_mods: BTreeMap<String, ItemMeta>,
    pub gear: BTreeMap<String, ItemMeta>,
    pub drones: BTreeMap<String, ItemMeta>,
    pub drone_mods: BTreeMap<String, ItemMeta>,
    pub lifestyles: BTreeMap<String, ItemMeta>,
    pub cyberlimb_upgrade_cost: f64,
}

impl Default for ChargenConstData {
    fn default() -> Self {
        ChargenConstData {
            attributes: default_attributes(),
            metatype_bounds: default_metatype_bounds(),
            priority_table: default_priority_table(),
            augments: BTreeMap::new(),
            augment_mods: BTreeMap::new(),
            gear: BTreeMap::new(),
            drones: BTreeMap::new(),
            drone_mods: BTreeMap::new(),
            lifestyles: BTreeMap::new(),
            cyberlimb_upgrade_cost: DEFAULT_CYBERLIMB_UPGRADE_COST,
        }
    }
}

impl ChargenConstData {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let catalog = serde_json::from_str(&data)?;
        Ok(catalog)
    }

    pub fn bounds_for(&self, metatype: &str) -> Option<&BTreeMap<String, AttributeBounds>> {
        self.metatype_bounds.get(&metatype.to_lowercase())
    }

    /// Bounds for one attribute: metatype override, then the attribute's own
    /// declaration, then [1, 6].
    pub fn attribute_bounds(&self, metatype: &str, attribute: &str) -> AttributeBounds {
        if let Some(bounds) = self
            .bounds_for(metatype)
            .and_then(|bounds| bounds.get(attribute))
        {
            return *bounds;
        }
        let fallback = AttributeBounds::default();
        match self.attributes.iter().find(|meta| meta.id == attribute) {
            Some(meta) => AttributeBounds::new(
                meta.min.unwrap_or(fallback.min),
                meta.max.unwrap_or(fallback.max),
            ),
            None => fallback,
        }
    }

    pub fn priority_row(&self, letter: PriorityLetter) -> Option<&PriorityRow> {
        self.priority_table.get(&letter)
    }
}

fn default_attributes() -> Vec<AttributeMeta> {
    [
        ("body", "Body"),
        ("agility", "Agility"),
        ("reaction", "Reaction"),
        ("strength", "Strength"),
        ("willpower", "Willpower"),
        ("logic", "Logic"),
        ("intuition", "Intuition"),
        ("charisma", "Charisma"),
    ]
    .into_iter()
    .map(|(id, name)| AttributeMeta::core(id, name))
    .collect()
}

fn default_metatype_bounds() -> BTreeMap<String, BTreeMap<String, AttributeBounds>> {
    let table: [(&str, &[(&str, i32, i32)]); 5] = [
        ("human", &[]),
        ("elf", &[("agility", 2, 7), ("charisma", 3, 8)]),
        (
            "dwarf",
            &[
                ("body", 3, 8),
                ("reaction", 1, 5),
                ("strength", 3, 8),
                ("willpower", 2, 7),
            ],
        ),
        (
            "ork",
            &[
                ("body", 4, 9),
                ("strength", 3, 8),
                ("logic", 1, 5),
                ("charisma", 1, 5),
            ],
        ),
        (
            "troll",
            &[
                ("body", 5, 10),
                ("agility", 1, 5),
                ("strength", 5, 10),
                ("logic", 1, 5),
                ("intuition", 1, 5),
                ("charisma", 1, 4),
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(metatype, overrides)| {
            let bounds = overrides
                .iter()
                .map(|(attr, min, max)| (attr.to_string(), AttributeBounds::new(*min, *max)))
                .collect();
            (metatype.to_string(), bounds)
        })
        .collect()
}

fn default_priority_table() -> BTreeMap<PriorityLetter, PriorityRow> {
    let rows: [(PriorityLetter, i32, i32, f64, &[(&str, i32)]); 5] = [
        (
            PriorityLetter::A,
            24,
            46,
            450_000.0,
            &[("human", 9), ("elf", 8), ("dwarf", 7), ("ork", 7), ("troll", 5)],
        ),
        (
            PriorityLetter::B,
            20,
            36,
            275_000.0,
            &[("human", 7), ("elf", 6), ("dwarf", 4), ("ork", 4), ("troll", 0)],
        ),
        (
            PriorityLetter::C,
            16,
            28,
            140_000.0,
            &[("human", 5), ("elf", 3), ("dwarf", 1), ("ork", 0)],
        ),
        (PriorityLetter::D, 14, 22, 50_000.0, &[("human", 3), ("elf", 0)]),
        (PriorityLetter::E, 12, 18, 6_000.0, &[("human", 1)]),
    ];

    rows.into_iter()
        .map(|(letter, attributes, skills, resources, special)| {
            let special = special
                .iter()
                .map(|(metatype, points)| (metatype.to_string(), *points))
                .collect();
            (
                letter,
                PriorityRow {
                    attributes,
                    skills,
                    resources,
                    special,
                },
            )
        })
        .collect()
}
