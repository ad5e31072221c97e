//! Cooperative event loop support.
//!
//! [`FormDriver`] owns a [`FormSession`](crate::session::FormSession) and the
//! one deferred effect it can schedule. Timers never touch the session: they
//! post a [`TimerSignal`] that the driver applies on its own turn.

mod driver;
mod timer;

pub use driver::FormDriver;
pub use timer::{TerminalTimer, TimerSignal};
