// Human-readable history labels for character edits.
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::state::ChargenState;

/// Fields compared when labelling an edit, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TrackedField {
    Priorities,
    Attributes,
    Skills,
    #[strum(to_string = "Skill Groups")]
    SkillGroups,
    #[strum(to_string = "Special Attributes")]
    Special,
    Awakening,
    Metatype,
    Spells,
    #[strum(to_string = "Adept Powers")]
    Powers,
    #[strum(to_string = "Complex Forms")]
    ComplexForms,
    Tradition,
    #[strum(to_string = "Mentor Spirit")]
    MentorSpirit,
    Augments,
    Gear,
    Drones,
    Contacts,
    #[strum(to_string = "Knowledge Skills")]
    KnowledgeSkills,
    Languages,
    Lifestyle,
    Notes,
}

impl TrackedField {
    pub fn differs(self, a: &ChargenState, b: &ChargenState) -> bool {
        match self {
            TrackedField::Priorities => a.priorities != b.priorities,
            TrackedField::Attributes => a.attributes != b.attributes,
            TrackedField::Skills => a.skills != b.skills,
            TrackedField::SkillGroups => a.skill_groups != b.skill_groups,
            TrackedField::Special => a.special != b.special,
            TrackedField::Awakening => a.awakening != b.awakening,
            TrackedField::Metatype => a.metatype_species != b.metatype_species,
            TrackedField::Spells => a.selected_spells != b.selected_spells,
            TrackedField::Powers => a.selected_powers != b.selected_powers,
            TrackedField::ComplexForms => a.selected_complex_forms != b.selected_complex_forms,
            TrackedField::Tradition => a.tradition != b.tradition,
            TrackedField::MentorSpirit => a.mentor_spirit != b.mentor_spirit,
            TrackedField::Augments => a.augments != b.augments,
            TrackedField::Gear => a.gear != b.gear,
            TrackedField::Drones => a.drones != b.drones,
            TrackedField::Contacts => a.contacts != b.contacts,
            TrackedField::KnowledgeSkills => a.knowledge_skills != b.knowledge_skills,
            TrackedField::Languages => a.languages != b.languages,
            TrackedField::Lifestyle => a.lifestyle != b.lifestyle,
            TrackedField::Notes => a.character_notes != b.character_notes,
        }
    }
}

pub fn changed_fields(prev: &ChargenState, next: &ChargenState) -> Vec<TrackedField> {
    TrackedField::iter()
        .filter(|field| field.differs(prev, next))
        .collect()
}

/// "Changed Attributes, Skills +2 more" style label for an edit.
pub fn describe_change(prev: Option<&ChargenState>, next: &ChargenState) -> String {
    let Some(prev) = prev else {
        return "Initial state".to_string();
    };
    let changed = changed_fields(prev, next);
    if changed.is_empty() {
        return "Minor change".to_string();
    }

    let shown: Vec<String> = changed.iter().take(2).map(ToString::to_string).collect();
    let mut label = format!("Changed {}", shown.join(", "));
    if changed.len() > 2 {
        label.push_str(&format!(" +{} more", changed.len() - 2));
    }
    label
}
