//! Stage kind and status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The widget kind of a stage.
///
/// This is a closed tag set: the dispatcher routes on it and the registry
/// validates kind-specific fields against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// A free text field.
    TextInput,
    /// A masked text field.
    PasswordInput,
    /// A dropdown over a fixed option list.
    SingleSelect,
    /// A two-state toggle.
    Checkbox,
    /// A cosmetic heading. Never gates later stages.
    Header,
    /// A terminal button that triggers the terminal effect.
    ActionButton,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextInput => write!(f, "text-input"),
            Self::PasswordInput => write!(f, "password-input"),
            Self::SingleSelect => write!(f, "single-select"),
            Self::Checkbox => write!(f, "checkbox"),
            Self::Header => write!(f, "header"),
            Self::ActionButton => write!(f, "action-button"),
        }
    }
}

impl StageKind {
    /// Returns true if stages of this kind take part in the gating check.
    #[must_use]
    pub fn is_gating(&self) -> bool {
        !matches!(self, Self::Header)
    }

    /// Returns true if this kind accepts free text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::TextInput | Self::PasswordInput)
    }

    /// Returns true if completion of this kind can be withdrawn.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

/// The rendered status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Not yet unlocked.
    Hidden,
    /// Visible and awaiting valid input.
    Pending,
    /// Visible and satisfied.
    Complete,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl StageStatus {
    /// Returns true if the stage is rendered.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::TextInput.to_string(), "text-input");
        assert_eq!(StageKind::PasswordInput.to_string(), "password-input");
        assert_eq!(StageKind::SingleSelect.to_string(), "single-select");
        assert_eq!(StageKind::Checkbox.to_string(), "checkbox");
        assert_eq!(StageKind::Header.to_string(), "header");
        assert_eq!(StageKind::ActionButton.to_string(), "action-button");
    }

    #[test]
    fn test_only_headers_skip_gating() {
        assert!(!StageKind::Header.is_gating());
        assert!(StageKind::ActionButton.is_gating());
        assert!(StageKind::Checkbox.is_gating());
    }

    #[test]
    fn test_only_checkbox_is_reversible() {
        assert!(StageKind::Checkbox.is_reversible());
        assert!(!StageKind::TextInput.is_reversible());
        assert!(!StageKind::SingleSelect.is_reversible());
    }

    #[test]
    fn test_stage_status_visibility() {
        assert!(!StageStatus::Hidden.is_visible());
        assert!(StageStatus::Pending.is_visible());
        assert!(StageStatus::Complete.is_visible());
        assert_eq!(StageStatus::default(), StageStatus::Hidden);
    }

    #[test]
    fn test_stage_kind_serialize() {
        let json = serde_json::to_string(&StageKind::SingleSelect).unwrap();
        assert_eq!(json, r#""single_select""#);

        let kind: StageKind = serde_json::from_str(r#""action_button""#).unwrap();
        assert_eq!(kind, StageKind::ActionButton);
    }
}
