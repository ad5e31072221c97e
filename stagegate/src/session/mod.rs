//! Session state and the event dispatcher.
//!
//! This module provides:
//! - [`CompletionSet`]: satisfied stage ids
//! - [`FormState`]: last accepted value per stage
//! - [`VisibilityResolver`]: which stages are shown
//! - [`FormSession`]: the dispatcher that owns and mutates all of the above

mod completion;
mod form;
mod outcome;
mod state;
mod visibility;

pub use completion::CompletionSet;
pub use form::{FormSession, Progress, RegistryReload, SessionPhase};
pub use outcome::DispatchOutcome;
pub use state::FormState;
pub use visibility::VisibilityResolver;
