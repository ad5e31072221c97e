//! Raw input values crossing the input boundary.

use super::StageKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw value produced by a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    /// The current contents of a text or password field.
    Text(String),
    /// The option picked in a single-select.
    Select(String),
    /// The new state of a checkbox.
    Toggle(bool),
    /// A button press.
    Activate,
}

impl InputValue {
    /// Returns a short label for this value's shape.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Select(_) => "selection",
            Self::Toggle(_) => "toggle",
            Self::Activate => "activation",
        }
    }

    /// Returns true if a stage of `kind` can receive this value.
    #[must_use]
    pub fn fits(&self, kind: StageKind) -> bool {
        match self {
            Self::Text(_) => kind.is_text(),
            Self::Select(_) => kind == StageKind::SingleSelect,
            Self::Toggle(_) => kind == StageKind::Checkbox,
            Self::Activate => kind == StageKind::ActionButton,
        }
    }

    /// Returns the string payload for text and select values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Select(s) => Some(s),
            Self::Toggle(_) | Self::Activate => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Select(s) => write!(f, "{s}"),
            Self::Toggle(true) => write!(f, "[x]"),
            Self::Toggle(false) => write!(f, "[ ]"),
            Self::Activate => write!(f, "<activated>"),
        }
    }
}

/// A user event addressed to one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    /// The id of the owning stage.
    pub stage_id: String,
    /// The raw widget value.
    pub value: InputValue,
}

impl FormInput {
    /// Creates a new input event.
    #[must_use]
    pub fn new(stage_id: impl Into<String>, value: InputValue) -> Self {
        Self {
            stage_id: stage_id.into(),
            value,
        }
    }

    /// A text or password field change.
    #[must_use]
    pub fn text(stage_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(stage_id, InputValue::Text(value.into()))
    }

    /// A single-select change.
    #[must_use]
    pub fn select(stage_id: impl Into<String>, option: impl Into<String>) -> Self {
        Self::new(stage_id, InputValue::Select(option.into()))
    }

    /// A checkbox toggle.
    #[must_use]
    pub fn toggle(stage_id: impl Into<String>, checked: bool) -> Self {
        Self::new(stage_id, InputValue::Toggle(checked))
    }

    /// A button activation.
    #[must_use]
    pub fn activate(stage_id: impl Into<String>) -> Self {
        Self::new(stage_id, InputValue::Activate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fits_both_text_kinds() {
        let value = InputValue::Text("x".to_string());
        assert!(value.fits(StageKind::TextInput));
        assert!(value.fits(StageKind::PasswordInput));
        assert!(!value.fits(StageKind::SingleSelect));
    }

    #[test]
    fn test_nothing_fits_header() {
        for value in [
            InputValue::Text(String::new()),
            InputValue::Select(String::new()),
            InputValue::Toggle(true),
            InputValue::Activate,
        ] {
            assert!(!value.fits(StageKind::Header), "{value:?} fit a header");
        }
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            FormInput::toggle("terms", true),
            FormInput::new("terms", InputValue::Toggle(true))
        );
        assert_eq!(FormInput::activate("submit").value.label(), "activation");
        assert_eq!(FormInput::select("gamble", "Red").value.as_str(), Some("Red"));
    }

    #[test]
    fn test_input_value_serialization() {
        let json = serde_json::to_value(InputValue::Toggle(false)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "toggle", "value": false}));
    }
}
