//! Stage definitions and their validators.
//!
//! A [`StageDefinition`] is one row of the declarative stage table: the widget
//! kind, its prompt and options, the predicate that satisfies it, and the side
//! effects it may command.

mod validators;

pub use validators::{
    AnyValue, ExactMatch, ExcludeValues, FnValidator, NonEmpty, PatternValidator, Validator,
};

use crate::core::StageKind;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// The side effect commanded when a stage rejects a value.
///
/// Returned to the caller; the engine never mutates the triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvalidResponse {
    /// A blocking acknowledgment to show the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Forces the widget's displayed value back to this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_to: Option<String>,
}

impl InvalidResponse {
    /// An acknowledgment with a message.
    #[must_use]
    pub fn acknowledge(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            reset_to: None,
        }
    }

    /// Also resets the displayed value.
    #[must_use]
    pub fn reset_to(mut self, value: impl Into<String>) -> Self {
        self.reset_to = Some(value.into());
        self
    }
}

/// What happens when an action-button is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TerminalEffect {
    /// Replace the whole view with the failure asset right away.
    Immediate {
        /// Opaque reference to the failure display asset.
        asset: String,
        /// Optional caption shown with the asset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Show a failure notice after a fixed delay.
    Delayed {
        /// Delay before the notice, in milliseconds.
        delay_ms: u64,
        /// The notice shown when the delay elapses.
        notice: String,
        /// Whether the session is fully reset after the notice.
        #[serde(default)]
        reset_after: bool,
    },
}

impl TerminalEffect {
    /// An immediate swap to `asset`.
    #[must_use]
    pub fn immediate(asset: impl Into<String>) -> Self {
        Self::Immediate {
            asset: asset.into(),
            caption: None,
        }
    }

    /// A delayed notice.
    #[must_use]
    pub fn delayed(delay: Duration, notice: impl Into<String>, reset_after: bool) -> Self {
        Self::Delayed {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            notice: notice.into(),
            reset_after,
        }
    }

    /// Returns the delay, if the effect is deferred.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Immediate { .. } => None,
            Self::Delayed { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
        }
    }

    /// A short label for logs and events.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Immediate { .. } => "immediate",
            Self::Delayed { .. } => "delayed",
        }
    }
}

/// One entry of the stage table.
#[derive(Clone)]
pub struct StageDefinition {
    /// Unique id, the key in the completion set.
    pub id: String,
    /// The widget kind.
    pub kind: StageKind,
    /// Display string.
    pub prompt: String,
    /// Options offered by a single-select, in display order.
    pub options: Vec<String>,
    /// The acceptance predicate. `None` accepts every value.
    pub validator: Option<Arc<dyn Validator>>,
    /// Side effect returned when the validator rejects a value.
    pub on_invalid: Option<InvalidResponse>,
    /// Terminal effect of an action-button.
    pub terminal: Option<TerminalEffect>,
}

impl StageDefinition {
    /// Creates a bare definition of the given kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: StageKind, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            options: Vec::new(),
            validator: None,
            on_invalid: None,
            terminal: None,
        }
    }

    /// A text field.
    #[must_use]
    pub fn text(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(id, StageKind::TextInput, prompt)
    }

    /// A password field.
    #[must_use]
    pub fn password(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(id, StageKind::PasswordInput, prompt)
    }

    /// A dropdown over `options`.
    #[must_use]
    pub fn select(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut def = Self::new(id, StageKind::SingleSelect, prompt);
        def.options = options.into_iter().map(Into::into).collect();
        def
    }

    /// A checkbox.
    #[must_use]
    pub fn checkbox(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(id, StageKind::Checkbox, prompt)
    }

    /// A cosmetic header.
    #[must_use]
    pub fn header(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(id, StageKind::Header, prompt)
    }

    /// A terminal button.
    #[must_use]
    pub fn button(id: impl Into<String>, prompt: impl Into<String>, terminal: TerminalEffect) -> Self {
        let mut def = Self::new(id, StageKind::ActionButton, prompt);
        def.terminal = Some(terminal);
        def
    }

    /// Sets the validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the rejection side effect.
    #[must_use]
    pub fn with_on_invalid(mut self, response: InvalidResponse) -> Self {
        self.on_invalid = Some(response);
        self
    }

    /// Runs the validator against a raw value.
    #[must_use]
    pub fn validate(&self, value: &str) -> bool {
        self.validator.as_ref().map_or(true, |v| v.validate(value))
    }

    /// Returns true if `option` is one of this stage's options.
    #[must_use]
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

impl Debug for StageDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDefinition")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("prompt", &self.prompt)
            .field("options", &self.options.len())
            .field("validator", &self.validator.as_ref().map(|v| v.name().to_string()))
            .field("on_invalid", &self.on_invalid)
            .field("terminal", &self.terminal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_without_validator_accepts_everything() {
        let def = StageDefinition::text("nickname", "Nickname");
        assert!(def.validate(""));
        assert!(def.validate("anything"));
    }

    #[test]
    fn test_definition_runs_validator() {
        let def = StageDefinition::text("answer", "What's 9 + 10?").with_validator(ExactMatch::new("21"));
        assert!(def.validate("21"));
        assert!(!def.validate("19"));
    }

    #[test]
    fn test_select_offers_only_its_options() {
        let def = StageDefinition::select("gamble", "Red or black", ["Red", "Black"]);
        assert_eq!(def.kind, StageKind::SingleSelect);
        assert!(def.offers("Red"));
        assert!(!def.offers("Green"));
    }

    #[test]
    fn test_invalid_response_builder() {
        let response = InvalidResponse::acknowledge("wrong answer buddy").reset_to("Red");
        assert_eq!(response.message.as_deref(), Some("wrong answer buddy"));
        assert_eq!(response.reset_to.as_deref(), Some("Red"));
    }

    #[test]
    fn test_terminal_effect_delay() {
        let immediate = TerminalEffect::immediate("bsod.png");
        assert_eq!(immediate.delay(), None);
        assert_eq!(immediate.mode(), "immediate");

        let delayed = TerminalEffect::delayed(Duration::from_secs(3), "Something went wrong", true);
        assert_eq!(delayed.delay(), Some(Duration::from_secs(3)));
        assert_eq!(delayed.mode(), "delayed");
    }

    #[test]
    fn test_terminal_effect_serialization() {
        let json = serde_json::to_value(TerminalEffect::immediate("bsod.png")).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "immediate", "asset": "bsod.png"}));

        let effect: TerminalEffect = serde_json::from_value(serde_json::json!({
            "mode": "delayed",
            "delay_ms": 1500,
            "notice": "oops"
        }))
        .unwrap();
        assert_eq!(effect, TerminalEffect::delayed(Duration::from_millis(1500), "oops", false));
    }

    #[test]
    fn test_debug_shows_validator_name() {
        let def = StageDefinition::text("email", "Email").with_validator(PatternValidator::email());
        let rendered = format!("{def:?}");
        assert!(rendered.contains("email"));
        assert!(rendered.contains("TextInput"));
    }
}
