//! Event sink trait and implementations.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Trait for event sinks that can receive form events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The type of event (e.g., "stage.completed")
    /// * `data` - Optional event data
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Tries to emit an event without blocking.
    ///
    /// Implementations must not panic; dispatch calls this inline.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    ///
    /// Levels other than `DEBUG` log at `INFO`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event_type: &str, data: Option<&serde_json::Value>) {
        let stage = data
            .and_then(|d| d.get("stage"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");

        if self.level == Level::DEBUG {
            debug!(event_type = %event_type, stage = %stage, event_data = ?data, "Form event: {}", event_type);
        } else {
            info!(event_type = %event_type, stage = %stage, event_data = ?data, "Form event: {}", event_type);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, data.as_ref());
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, data.as_ref());
    }
}

/// One event recorded by [`CollectingEventSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Event type, such as `stage.completed`.
    pub event_type: String,
    /// The `stage` field of the payload, when present.
    pub stage: Option<String>,
    /// The full payload.
    pub data: Option<serde_json::Value>,
}

impl RecordedEvent {
    fn new(event_type: &str, data: Option<serde_json::Value>) -> Self {
        let stage = data
            .as_ref()
            .and_then(|d| d.get("stage"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        Self {
            event_type: event_type.to_string(),
            stage,
            data,
        }
    }
}

/// Records every event in memory so tests can inspect what a session reported.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    recorded: RwLock<Vec<RecordedEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.recorded.read().clone()
    }

    /// Event types in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.recorded.read().iter().map(|e| e.event_type.clone()).collect()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded.read().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.recorded.write().clear();
    }

    /// Events whose type starts with `prefix`, so `"stage."` selects every
    /// per-stage event.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<RecordedEvent> {
        self.recorded
            .read()
            .iter()
            .filter(|e| e.event_type.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Stage ids of every event with exactly this type, in order.
    #[must_use]
    pub fn stages_for(&self, event_type: &str) -> Vec<String> {
        self.recorded
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .filter_map(|e| e.stage.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.try_emit(event_type, data);
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.recorded.write().push(RecordedEvent::new(event_type, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_discarding_and_logging_sinks_accept_anything() {
        NoOpEventSink.emit("form.reset", None).await;
        NoOpEventSink.try_emit("stage.rejected", Some(json!({"stage": "email"})));
        LoggingEventSink::default()
            .emit("stage.completed", Some(json!({"stage": "username", "revealed": ["email"]})))
            .await;
        LoggingEventSink::debug().try_emit("form.terminal", Some(json!(["not", "an", "object"])));
    }

    #[tokio::test]
    async fn test_recorded_events_keep_order_and_stage() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.try_emit("stage.completed", Some(json!({"stage": "terms"})));
        sink.emit("stage.cleared", Some(json!({"stage": "terms", "concealed": ["create_account"]})))
            .await;
        sink.try_emit("form.reset", Some(json!({"session_id": "abc"})));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.event_types(), vec!["stage.completed", "stage.cleared", "form.reset"]);
        assert_eq!(sink.stages_for("stage.cleared"), vec!["terms"]);
        assert_eq!(sink.events()[2].stage, None);
        assert_eq!(sink.events_of_type("stage.").len(), 2);
    }

    #[test]
    fn test_clear_forgets_events() {
        let sink = CollectingEventSink::new();
        sink.try_emit("stage.rejected", Some(json!({"stage": "arithmetic"})));
        sink.clear();
        assert!(sink.is_empty());
        assert!(sink.stages_for("stage.rejected").is_empty());
    }
}
