//! Cooperative cancellation for deferred effects.

mod token;

pub use token::CancellationToken;
