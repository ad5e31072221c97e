//! Core domain model types for stagegate.
//!
//! This module contains the fundamental types used throughout the engine:
//! - Stage kind and status enums
//! - Raw input values and the events that carry them
//! - Observability events

mod event;
mod input;
mod status;

pub use event::FormEvent;
pub use input::{FormInput, InputValue};
pub use status::{StageKind, StageStatus};
