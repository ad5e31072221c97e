//! Error types for the stagegate engine.
//!
//! Validation failures on user input are never errors: they are reported as
//! [`DispatchOutcome`](crate::session::DispatchOutcome) values. The types here
//! cover misconfigured registries and callers that address the engine
//! incorrectly (unknown stages, mismatched value kinds, hidden widgets).

use crate::core::StageKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for stagegate operations.
#[derive(Debug, Error)]
pub enum StagegateError {
    /// The stage registry failed validation.
    #[error("{0}")]
    Registry(#[from] RegistryValidationError),

    /// The configuration could not be loaded or is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// An event addressed a stage id that is not in the registry.
    #[error("Unknown stage: '{stage_id}'")]
    UnknownStage {
        /// The unknown stage id.
        stage_id: String,
    },

    /// An event carried a value that does not fit the stage's kind.
    #[error("Stage '{stage_id}' is a {expected} stage and cannot accept a {received} value")]
    KindMismatch {
        /// The addressed stage.
        stage_id: String,
        /// The kind of the addressed stage.
        expected: StageKind,
        /// A short label for the value that was received.
        received: &'static str,
    },

    /// An event addressed a stage that is not currently visible.
    #[error("Stage '{stage_id}' is not visible yet")]
    StageHidden {
        /// The hidden stage.
        stage_id: String,
    },

    /// A single-select event picked an option outside the stage's option list.
    #[error("Option '{option}' is not offered by stage '{stage_id}'")]
    UnknownOption {
        /// The addressed stage.
        stage_id: String,
        /// The rejected option.
        option: String,
    },

    /// A delayed terminal effect was triggered outside a tokio runtime.
    #[error("Stage '{stage_id}' schedules a delayed effect, which needs a running tokio runtime")]
    RuntimeUnavailable {
        /// The button stage.
        stage_id: String,
    },
}

impl StagegateError {
    /// Creates an unknown stage error.
    #[must_use]
    pub fn unknown_stage(stage_id: impl Into<String>) -> Self {
        Self::UnknownStage {
            stage_id: stage_id.into(),
        }
    }

    /// Creates a stage hidden error.
    #[must_use]
    pub fn stage_hidden(stage_id: impl Into<String>) -> Self {
        Self::StageHidden {
            stage_id: stage_id.into(),
        }
    }

    /// Creates an unknown option error.
    #[must_use]
    pub fn unknown_option(stage_id: impl Into<String>, option: impl Into<String>) -> Self {
        Self::UnknownOption {
            stage_id: stage_id.into(),
            option: option.into(),
        }
    }
}

/// Result alias for stagegate operations.
pub type Result<T> = std::result::Result<T, StagegateError>;

/// Metadata about a registry error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "REGISTRY-DUPLICATE_ID").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Creates an info whose fix hint comes from [`ContractSuggestions`].
    #[must_use]
    pub fn suggested(code: &str, summary: impl Into<String>) -> Self {
        let info = Self::new(code, summary);
        match ContractSuggestions::get(code) {
            Some(hint) => info.with_fix_hint(hint),
            None => info,
        }
    }
}

/// Error raised when a stage registry fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RegistryValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
    /// Optional contract error info.
    pub error_info: Option<ContractErrorInfo>,
}

impl RegistryValidationError {
    /// Creates a new registry validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the contract error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the contract error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Errors raised while loading or validating a [`FormConfig`](crate::config::FormConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        /// The path that was read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A configuration value is out of range.
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Provides default suggestions for registry error codes.
pub struct ContractSuggestions;

impl ContractSuggestions {
    /// Gets a suggestion for a given error code.
    #[must_use]
    pub fn get(code: &str) -> Option<&'static str> {
        match code {
            "REGISTRY-EMPTY" => Some("Add at least one stage to the registry before building."),
            "REGISTRY-EMPTY_ID" => Some("Give every stage a non-empty, non-whitespace id."),
            "REGISTRY-DUPLICATE_ID" => Some(
                "Stage ids key the completion set and must be unique. \
                 Rename one of the stages.",
            ),
            "REGISTRY-MISSING_OPTIONS" => {
                Some("Single-select stages need at least one option to choose from.")
            }
            "REGISTRY-UNEXPECTED_OPTIONS" => {
                Some("Only single-select stages carry options. Remove them from this stage.")
            }
            "REGISTRY-RESET_NOT_AN_OPTION" => Some(
                "A select stage can only reset its displayed value to one of its own options.",
            ),
            "REGISTRY-MISSING_TERMINAL" => {
                Some("Action-button stages must declare the terminal effect they trigger.")
            }
            "REGISTRY-UNEXPECTED_TERMINAL" => {
                Some("Only action-button stages may declare a terminal effect.")
            }
            _ => None,
        }
    }
}
