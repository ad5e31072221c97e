//! Event sink system for observability.
//!
//! Sessions report every dispatch decision to an [`EventSink`]. The default is
//! [`NoOpEventSink`]; [`LoggingEventSink`] forwards to `tracing` and
//! [`CollectingEventSink`] records events for tests.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};

use crate::core::FormEvent;

/// Emits a [`FormEvent`] through `sink` without blocking.
pub fn emit_form_event(sink: &dyn EventSink, event: &FormEvent) {
    sink.try_emit(&event.event_type, Some(event.payload()));
}
