//! Utility functions for session identifiers and timestamps.

pub mod timestamps;

pub use timestamps::{iso_timestamp, now_utc, Timestamp};

use uuid::Uuid;

/// Generates a new session identifier (UUID v4).
#[must_use]
pub fn generate_session_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_id_is_v4() {
        let id = generate_session_id();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_session_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
