//! Classifies a character's budget summary into errors that block saving and
//! warnings that are merely surfaced.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::dashboard::DashboardData;
use crate::state::ChargenState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    Attributes,
    Skills,
    Special,
    Magic,
    Augments,
    Resources,
}

// What the UI can offer to do about an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixAction {
    OpenSection(Section),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    pub severity: Severity,
    pub section: Section,
    pub field: Option<String>,
    pub suggestion: Option<String>,
    pub fix_action: Option<FixAction>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, section: Section, message: impl Into<String>) -> Self {
        ValidationIssue {
            message: message.into(),
            severity,
            section,
            field: None,
            suggestion: None,
            fix_action: Some(FixAction::OpenSection(section)),
        }
    }

    pub fn error(section: Section, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, section, message)
    }

    pub fn warning(section: Section, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, section, message)
    }

    pub fn info(section: Section, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, section, message)
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub is_valid: bool,
    pub can_save: bool,
}

impl ValidationResult {
    /// Result used while there is no data to judge yet.
    pub fn missing_data() -> Self {
        ValidationResult {
            issues: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            is_valid: false,
            can_save: false,
        }
    }

    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let count = |severity| {
            issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .count()
        };
        let error_count = count(Severity::Error);
        let warning_count = count(Severity::Warning);
        let info_count = count(Severity::Info);
        ValidationResult {
            error_count,
            warning_count,
            info_count,
            is_valid: error_count == 0 && warning_count == 0,
            can_save: error_count == 0,
            issues,
        }
    }

    pub fn issues_for(&self, section: Section) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.section == section)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }
}

fn plural(count: i64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// `12500` becomes `12,500`.
pub fn format_nuyen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn check_pool(
    issues: &mut Vec<ValidationIssue>,
    section: Section,
    pool: &str,
    remaining: i32,
    warn_unspent: bool,
) {
    let amount = i64::from(remaining).abs();
    if remaining < 0 {
        issues.push(
            ValidationIssue::error(
                section,
                format!("Overspent {amount} {pool} point{}", plural(amount)),
            )
            .suggestion(format!("Lower some {pool} ratings to free up points")),
        );
    } else if remaining > 0 && warn_unspent {
        issues.push(
            ValidationIssue::warning(
                section,
                format!("{amount} unspent {pool} point{}", plural(amount)),
            )
            .suggestion(format!("Spend the remaining {pool} points")),
        );
    }
}

pub fn validate_chargen_state(
    dashboard: Option<&DashboardData>,
    state: Option<&ChargenState>,
) -> ValidationResult {
    let (Some(dashboard), Some(state)) = (dashboard, state) else {
        return ValidationResult::missing_data();
    };

    let mut issues = Vec::new();

    check_pool(
        &mut issues,
        Section::Attributes,
        "attribute",
        dashboard.attr_remaining,
        true,
    );
    check_pool(
        &mut issues,
        Section::Skills,
        "skill",
        dashboard.skill_remaining,
        true,
    );
    // Mundane characters often have no special pool at all.
    check_pool(
        &mut issues,
        Section::Special,
        "special attribute",
        dashboard.special_remaining,
        dashboard.special_total > 0,
    );

    if state.is_awakened() && state.awakening.is_caster() {
        let has_tradition = state
            .tradition
            .as_deref()
            .is_some_and(|tradition| !tradition.trim().is_empty());
        if !has_tradition {
            issues.push(
                ValidationIssue::warning(Section::Magic, "No magical tradition selected")
                    .field("tradition")
                    .suggestion("Pick a tradition such as Hermetic or Shamanic"),
            );
        }
        if state.selected_spells.is_empty() {
            issues.push(
                ValidationIssue::warning(Section::Magic, "No spells selected")
                    .field("selected_spells")
                    .suggestion("Choose at least one spell"),
            );
        }
    }

    if dashboard.essence_remaining < 0.0 {
        issues.push(
            ValidationIssue::error(Section::Augments, "Essence cannot go below 0")
                .suggestion("Remove augments or choose a better grade"),
        );
    }

    if dashboard.nuyen_remaining < 0 {
        issues.push(
            ValidationIssue::error(
                Section::Resources,
                format!(
                    "Overspent ¥{} nuyen",
                    format_nuyen(dashboard.nuyen_remaining.abs())
                ),
            )
            .suggestion("Sell gear, drones or augments, or pick a cheaper lifestyle"),
        );
    }

    let result = ValidationResult::from_issues(issues);
    log::debug!(
        "Validated chargen state: {} error(s), {} warning(s)",
        result.error_count,
        result.warning_count
    );
    result
}
