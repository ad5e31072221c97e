//! Test assertions for form sessions.

use crate::session::FormSession;

/// Asserts that a stage is shown.
pub fn assert_visible(session: &FormSession, id: &str) {
    assert!(
        session.is_visible(id),
        "Expected stage '{}' to be visible. Visible: {:?}",
        id,
        session.visibility().visible_ids()
    );
}

/// Asserts that a stage is hidden.
pub fn assert_hidden(session: &FormSession, id: &str) {
    assert!(
        !session.is_visible(id),
        "Expected stage '{}' to be hidden. Visible: {:?}",
        id,
        session.visibility().visible_ids()
    );
}

/// Asserts that a stage is in the completion set.
pub fn assert_complete(session: &FormSession, id: &str) {
    assert!(
        session.is_complete(id),
        "Expected stage '{}' to be complete, but it isn't",
        id
    );
}

/// Asserts that a stage is not in the completion set.
pub fn assert_incomplete(session: &FormSession, id: &str) {
    assert!(
        !session.is_complete(id),
        "Expected stage '{}' to be incomplete, but it is",
        id
    );
}

/// Asserts the exact ordered list of visible stage ids.
pub fn assert_visible_ids(session: &FormSession, expected: &[&str]) {
    let actual = session.visibility().visible_ids();
    assert_eq!(actual, expected, "Visible stages differ");
}
