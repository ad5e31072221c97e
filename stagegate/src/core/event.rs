//! Form event type for observability.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An event emitted by a session as it handles input.
///
/// Events are consumed by [`EventSink`](crate::events::EventSink)
/// implementations for logging and testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEvent {
    /// The event type (e.g., "stage.completed", "form.terminal").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl FormEvent {
    /// Creates a new form event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns the payload as a JSON object, including the timestamp.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let mut map: serde_json::Map<String, serde_json::Value> =
            self.data.clone().into_iter().collect();
        map.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        serde_json::Value::Object(map)
    }

    fn for_stage(event_type: &str, session_id: &str, stage_id: &str) -> Self {
        Self::new(event_type)
            .add_data("session_id", serde_json::json!(session_id))
            .add_data("stage", serde_json::json!(stage_id))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn completed(session_id: &str, stage_id: &str, revealed: &[String]) -> Self {
        Self::for_stage("stage.completed", session_id, stage_id)
            .add_data("revealed", serde_json::json!(revealed))
    }

    /// Creates a "stage.cleared" event.
    #[must_use]
    pub fn cleared(session_id: &str, stage_id: &str, concealed: &[String]) -> Self {
        Self::for_stage("stage.cleared", session_id, stage_id)
            .add_data("concealed", serde_json::json!(concealed))
    }

    /// Creates a "stage.rejected" event.
    #[must_use]
    pub fn rejected(session_id: &str, stage_id: &str) -> Self {
        Self::for_stage("stage.rejected", session_id, stage_id)
    }

    /// Creates a "stage.acknowledged" event.
    #[must_use]
    pub fn acknowledged(session_id: &str, stage_id: &str, message: Option<&str>) -> Self {
        Self::for_stage("stage.acknowledged", session_id, stage_id)
            .add_data("message", serde_json::json!(message))
    }

    /// Creates a "form.terminal" event.
    #[must_use]
    pub fn terminal(session_id: &str, stage_id: &str, mode: &str) -> Self {
        Self::for_stage("form.terminal", session_id, stage_id)
            .add_data("mode", serde_json::json!(mode))
    }

    /// Creates a "form.reset" event.
    #[must_use]
    pub fn reset(session_id: &str) -> Self {
        Self::new("form.reset").add_data("session_id", serde_json::json!(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = FormEvent::new("test.event");
        assert_eq!(event.event_type, "test.event");
        assert!(event.data.is_empty());
    }

    #[test]
    fn test_completed_event() {
        let event = FormEvent::completed("s1", "username", &["email".to_string()]);
        assert_eq!(event.event_type, "stage.completed");
        assert_eq!(event.data.get("stage"), Some(&serde_json::json!("username")));
        assert_eq!(event.data.get("revealed"), Some(&serde_json::json!(["email"])));
    }

    #[test]
    fn test_payload_carries_timestamp() {
        let event = FormEvent::reset("s1");
        let payload = event.payload();
        assert_eq!(payload["session_id"], "s1");
        assert!(payload["timestamp"].is_string());
    }

    #[test]
    fn test_event_serialization() {
        let event = FormEvent::rejected("s1", "email");
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: FormEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.event_type, deserialized.event_type);
        assert!(json.contains(r#""type":"stage.rejected""#));
    }
}
