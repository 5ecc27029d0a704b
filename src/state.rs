// Character state exchanged with the server during character generation.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Quality id that lowers the essence cost of every augment.
pub const BIOCOMPATIBILITY: &str = "biocompatibility";

/// Snapshots that can become read-only once finalized.
pub trait Lockable {
    fn is_locked(&self) -> bool {
        false
    }
}

impl Lockable for serde_json::Value {}

// Augmentation quality tiers, trading essence for nuyen.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AugmentGrade {
    Used,
    Standard,
    Alphaware,
    Betaware,
    Deltaware,
}

impl AugmentGrade {
    pub fn essence_multiplier(self) -> f64 {
        match self {
            AugmentGrade::Used => 1.25,
            AugmentGrade::Standard => 1.0,
            AugmentGrade::Alphaware => 0.8,
            AugmentGrade::Betaware => 0.7,
            AugmentGrade::Deltaware => 0.5,
        }
    }

    pub fn cost_multiplier(self) -> f64 {
        match self {
            AugmentGrade::Used => 0.75,
            AugmentGrade::Standard => 1.0,
            AugmentGrade::Alphaware => 1.2,
            AugmentGrade::Betaware => 1.5,
            AugmentGrade::Deltaware => 2.5,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum PriorityLetter {
    A,
    B,
    C,
    D,
    E,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PriorityCategory {
    Metatype,
    Attributes,
    Magic,
    Skills,
    Resources,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Awakening {
    #[default]
    Mundane,
    Mage,
    MysticAdept,
    Adept,
    Aspected,
    Technomancer,
}

impl Awakening {
    /// Awakened characters who cast spells and follow a tradition.
    pub fn is_caster(self) -> bool {
        matches!(self, Awakening::Mage | Awakening::MysticAdept)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentSelection {
    pub id: String,
    pub grade: String, // Kept as text so stale or unknown grades still load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agi_upgrade: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub str_upgrade: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mods: Vec<String>,
}

impl AugmentSelection {
    pub fn new(id: impl Into<String>, grade: AugmentGrade) -> Self {
        AugmentSelection {
            id: id.into(),
            grade: grade.to_string(),
            ..Default::default()
        }
    }

    pub fn grade(&self) -> Option<AugmentGrade> {
        AugmentGrade::from_str(&self.grade).ok()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneSelection {
    pub mods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSelection {
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl GearSelection {
    pub fn new(id: impl Into<String>) -> Self {
        GearSelection {
            id: id.into(),
            quantity: 1,
        }
    }
}

// Define a structure for contacts within the game, representing relationships and connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_id: String, // Archetype id from the contact catalog.
    #[serde(deserialize_with = "connection_rating")]
    pub connection: u8,
    #[serde(deserialize_with = "loyalty_rating")]
    pub loyalty: u8,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Contact {
    pub const CONNECTION_RANGE: (u8, u8) = (1, 12);
    pub const LOYALTY_RANGE: (u8, u8) = (1, 6);

    pub fn clamped(mut self) -> Self {
        self.connection = self
            .connection
            .clamp(Self::CONNECTION_RANGE.0, Self::CONNECTION_RANGE.1);
        self.loyalty = self
            .loyalty
            .clamp(Self::LOYALTY_RANGE.0, Self::LOYALTY_RANGE.1);
        self
    }
}

// Ratings outside the table are pulled back into range on load, so a patch
// can never store an impossible contact.
fn clamped_rating<'de, D>(deserializer: D, (min, max): (u8, u8)) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = i64::deserialize(deserializer)?;
    Ok(rating.clamp(i64::from(min), i64::from(max)) as u8)
}

fn connection_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    clamped_rating(deserializer, Contact::CONNECTION_RANGE)
}

fn loyalty_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    clamped_rating(deserializer, Contact::LOYALTY_RANGE)
}

/// The authoritative character snapshot, as the server sends it.
///
/// Every field defaults so partially filled characters (and partial JSON)
/// still load.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargenState {
    pub priorities: BTreeMap<PriorityCategory, PriorityLetter>,
    pub metatype_species: String,
    pub awakening: Awakening,

    pub attributes: BTreeMap<String, i32>,
    pub special: BTreeMap<String, i32>,

    pub skills: BTreeMap<String, i32>,
    pub skill_groups: BTreeMap<String, i32>,
    pub skill_specializations: BTreeMap<String, Vec<String>>,
    pub knowledge_skills: BTreeMap<String, i32>,
    pub languages: BTreeMap<String, i32>,

    pub tradition: Option<String>,
    pub mentor_spirit: Option<String>,
    pub selected_spells: Vec<String>,
    pub selected_powers: BTreeMap<String, i32>,
    pub selected_complex_forms: Vec<String>,

    pub qualities: Vec<String>,
    pub augments: BTreeMap<String, AugmentSelection>,
    pub drones: BTreeMap<String, DroneSelection>,
    pub gear: Vec<GearSelection>,
    pub lifestyle: String,

    pub contacts: Vec<Contact>,
    pub sin_status: String,
    pub birthplace: String,
    pub religion: String,
    pub character_notes: String,

    pub saved: bool,
}

impl Lockable for ChargenState {
    fn is_locked(&self) -> bool {
        self.saved
    }
}

impl ChargenState {
    pub fn priority(&self, category: PriorityCategory) -> Option<PriorityLetter> {
        self.priorities.get(&category).copied()
    }

    pub fn attribute(&self, id: &str) -> Option<i32> {
        self.attributes.get(id).copied()
    }

    pub fn skill(&self, id: &str) -> i32 {
        self.skills.get(id).copied().unwrap_or(0)
    }

    pub fn has_biocompatibility(&self) -> bool {
        self.qualities
            .iter()
            .any(|quality| quality.eq_ignore_ascii_case(BIOCOMPATIBILITY))
    }

    /// Awakened for rules purposes: not mundane and magic not bought at E.
    pub fn is_awakened(&self) -> bool {
        self.awakening != Awakening::Mundane
            && self.priority(PriorityCategory::Magic) != Some(PriorityLetter::E)
    }
}
