//! Last accepted value per stage.

use crate::core::InputValue;
use serde::Serialize;
use std::collections::HashMap;

/// Mapping from stage id to the last value the stage accepted.
///
/// Not consulted for gating; it accumulates what the user entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    values: HashMap<String, InputValue>,
}

impl FormState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted value, replacing any earlier one.
    pub fn record(&mut self, id: impl Into<String>, value: InputValue) {
        self.values.insert(id.into(), value);
    }

    /// Returns the last accepted value of a stage.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&InputValue> {
        self.values.get(id)
    }

    /// Returns the last accepted text or selection of a stage.
    #[must_use]
    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(InputValue::as_str)
    }

    /// Returns the number of recorded stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forgets every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Renders the state as a JSON object keyed by stage id.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_replaces() {
        let mut state = FormState::new();
        state.record("username", InputValue::Text("al".to_string()));
        state.record("username", InputValue::Text("alice".to_string()));

        assert_eq!(state.len(), 1);
        assert_eq!(state.get_str("username"), Some("alice"));
    }

    #[test]
    fn test_get_str_ignores_toggles() {
        let mut state = FormState::new();
        state.record("terms", InputValue::Toggle(true));
        assert_eq!(state.get("terms"), Some(&InputValue::Toggle(true)));
        assert_eq!(state.get_str("terms"), None);
    }

    #[test]
    fn test_to_json() {
        let mut state = FormState::new();
        state.record("gamble", InputValue::Select("Black".to_string()));
        let json = state.to_json();
        assert_eq!(json["gamble"], serde_json::json!({"type": "select", "value": "Black"}));
    }
}
