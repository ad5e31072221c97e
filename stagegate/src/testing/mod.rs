//! Testing utilities for stage registries and sessions.
//!
//! This module provides:
//! - Assertions over session visibility and completion
//! - Fixtures for common registries and sessions

mod assertions;
mod fixtures;

pub use assertions::{
    assert_complete, assert_hidden, assert_incomplete, assert_visible, assert_visible_ids,
};
pub use fixtures::{collecting_signup_session, linear_registry, SessionFixture};
