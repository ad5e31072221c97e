//! Results of dispatching one input event.

use crate::stages::{InvalidResponse, TerminalEffect};
use serde::{Deserialize, Serialize};

/// What a single dispatched event did.
///
/// Rejections are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The stage is (still) complete.
    Accepted {
        /// The stage that accepted the value.
        stage_id: String,
        /// Stages that became visible because of this event, in order.
        revealed: Vec<String>,
    },
    /// A checkbox was unchecked.
    Cleared {
        /// The checkbox stage.
        stage_id: String,
        /// Stages hidden again because of this event, in order.
        concealed: Vec<String>,
    },
    /// The validator refused the value and nothing else happened.
    Rejected {
        /// The stage that refused the value.
        stage_id: String,
    },
    /// The validator refused the value and the stage commands a side effect.
    Acknowledged {
        /// The stage that refused the value.
        stage_id: String,
        /// The side effect to apply.
        response: InvalidResponse,
    },
    /// An action-button fired its terminal effect.
    Terminal {
        /// The button stage.
        stage_id: String,
        /// The effect that fired or was scheduled.
        effect: TerminalEffect,
    },
    /// The session has already ended; the event was ignored.
    Discarded,
}

impl DispatchOutcome {
    /// Returns true if the event satisfied its stage.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Returns true if the event was refused, silently or not.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Acknowledged { .. })
    }

    /// Returns the stages revealed by this event.
    #[must_use]
    pub fn revealed(&self) -> &[String] {
        match self {
            Self::Accepted { revealed, .. } => revealed,
            _ => &[],
        }
    }

    /// Returns the delay of a scheduled terminal effect.
    #[must_use]
    pub fn scheduled_delay(&self) -> Option<std::time::Duration> {
        match self {
            Self::Terminal { effect, .. } => effect.delay(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_outcome_predicates() {
        let accepted = DispatchOutcome::Accepted {
            stage_id: "username".to_string(),
            revealed: vec!["email".to_string()],
        };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.revealed(), ["email".to_string()]);

        let rejected = DispatchOutcome::Rejected {
            stage_id: "email".to_string(),
        };
        assert!(rejected.is_rejection());
        assert!(rejected.revealed().is_empty());
        assert!(!DispatchOutcome::Discarded.is_rejection());
    }

    #[test]
    fn test_scheduled_delay() {
        let delayed = DispatchOutcome::Terminal {
            stage_id: "submit".to_string(),
            effect: TerminalEffect::delayed(Duration::from_secs(2), "oops", false),
        };
        assert_eq!(delayed.scheduled_delay(), Some(Duration::from_secs(2)));

        let immediate = DispatchOutcome::Terminal {
            stage_id: "submit".to_string(),
            effect: TerminalEffect::immediate("bsod.png"),
        };
        assert_eq!(immediate.scheduled_delay(), None);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(DispatchOutcome::Rejected {
            stage_id: "email".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "rejected", "stage_id": "email"}));
    }
}
