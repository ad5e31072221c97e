//! # Stagegate
//!
//! A sequential stage-gating engine for multi-step forms.
//!
//! A form is an ordered registry of stages. Each stage is shown only once every
//! gating stage before it has been satisfied, so the form reveals itself one
//! question at a time. Stagegate provides:
//!
//! - **Declarative registries**: Ordered, validated stage definitions
//! - **Gated visibility**: A pure function of the registry and the completion set
//! - **Single-threaded dispatch**: One owner mutates session state per event
//! - **Terminal effects**: Immediate or delayed, with cancellable timers
//! - **Event emission**: Structured events for every state change
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagegate::prelude::*;
//!
//! let registry = RegistryBuilder::new("signup")
//!     .stage(StageDefinition::text("username", "Enter username").with_validator(NonEmpty))
//!     .stage(StageDefinition::checkbox("terms", "I agree"))
//!     .build()?;
//!
//! let mut session = FormSession::new(Arc::new(registry));
//! let outcome = session.dispatch(FormInput::text("username", "alice"))?;
//! assert_eq!(outcome.revealed(), ["terms".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod palette;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod session;
pub mod signup;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{FormConfig, TerminalConfig, TerminalMode};
    pub use crate::core::{FormEvent, FormInput, InputValue, StageKind, StageStatus};
    pub use crate::errors::{
        ConfigError, ContractErrorInfo, RegistryValidationError, StagegateError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::registry::{RegistryBuilder, StageRegistry};
    pub use crate::render::{TerminalView, View, Widget};
    pub use crate::runtime::{FormDriver, TerminalTimer, TimerSignal};
    pub use crate::session::{
        CompletionSet, DispatchOutcome, FormSession, FormState, Progress, SessionPhase,
        VisibilityResolver,
    };
    pub use crate::signup::{signup_registry, signup_session};
    pub use crate::stages::{
        AnyValue, ExactMatch, ExcludeValues, InvalidResponse, NonEmpty, PatternValidator,
        StageDefinition, TerminalEffect, Validator,
    };
    pub use crate::utils::{generate_session_id, iso_timestamp, Timestamp};
    pub use std::sync::Arc;
}
