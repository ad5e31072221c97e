//! Configuration for the signup form.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::errors::ConfigError;
use crate::palette::MAX_PALETTE_SIZE;
use crate::stages::TerminalEffect;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Title shown above the form.
    #[serde(default = "default_title")]
    pub title: String,
    /// Number of colors offered by the favorite-color question.
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,
    /// Seed for the color palette. Random when absent.
    #[serde(default)]
    pub palette_seed: Option<u64>,
    /// Acknowledgment shown for the trick gamble answer.
    #[serde(default = "default_gamble_acknowledgment")]
    pub gamble_acknowledgment: String,
    /// Option the gamble question snaps back to after the trick answer.
    #[serde(default = "default_gamble_fallback")]
    pub gamble_fallback: String,
    /// The only accepted answer to the arithmetic question.
    #[serde(default = "default_arithmetic_answer")]
    pub arithmetic_answer: String,
    /// What the final button does.
    #[serde(default)]
    pub terminal: TerminalConfig,
}

fn default_title() -> String {
    "Welcome to THE WEBSITE".to_string()
}

fn default_palette_size() -> usize {
    100
}

fn default_gamble_acknowledgment() -> String {
    "wrong answer buddy".to_string()
}

fn default_gamble_fallback() -> String {
    "Red".to_string()
}

fn default_arithmetic_answer() -> String {
    "21".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            palette_size: default_palette_size(),
            palette_seed: None,
            gamble_acknowledgment: default_gamble_acknowledgment(),
            gamble_fallback: default_gamble_fallback(),
            arithmetic_answer: default_arithmetic_answer(),
            terminal: TerminalConfig::default(),
        }
    }
}

impl FormConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Sets the palette seed.
    #[must_use]
    pub fn with_palette_seed(mut self, seed: u64) -> Self {
        self.palette_seed = Some(seed);
        self
    }

    /// Sets the terminal configuration.
    #[must_use]
    pub fn with_terminal(mut self, terminal: TerminalConfig) -> Self {
        self.terminal = terminal;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette_size == 0 {
            return Err(ConfigError::invalid("palette_size", "must be at least 1"));
        }
        if self.palette_size > MAX_PALETTE_SIZE {
            return Err(ConfigError::invalid(
                "palette_size",
                format!("cannot exceed {MAX_PALETTE_SIZE}"),
            ));
        }
        if self.arithmetic_answer.is_empty() {
            return Err(ConfigError::invalid("arithmetic_answer", "cannot be empty"));
        }
        self.terminal.validate()
    }
}

/// Which terminal behavior the final button uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMode {
    /// Swap to the failure asset at once.
    #[default]
    Immediate,
    /// Show a notice after a delay.
    Delayed,
}

/// Configuration of the terminal effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Immediate or delayed.
    #[serde(default)]
    pub mode: TerminalMode,
    /// Failure asset reference for immediate mode.
    #[serde(default = "default_asset")]
    pub asset: String,
    /// Optional caption for immediate mode.
    #[serde(default)]
    pub caption: Option<String>,
    /// Delay in milliseconds for delayed mode.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Notice text for delayed mode.
    #[serde(default = "default_notice")]
    pub notice: String,
    /// Whether delayed mode resets the session after the notice.
    #[serde(default = "default_reset_after")]
    pub reset_after: bool,
}

fn default_asset() -> String {
    "bsod.png".to_string()
}

fn default_delay_ms() -> u64 {
    3000
}

fn default_notice() -> String {
    "Something went wrong. Please try again.".to_string()
}

fn default_reset_after() -> bool {
    true
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mode: TerminalMode::default(),
            asset: default_asset(),
            caption: None,
            delay_ms: default_delay_ms(),
            notice: default_notice(),
            reset_after: default_reset_after(),
        }
    }
}

impl TerminalConfig {
    /// A delayed-mode configuration.
    #[must_use]
    pub fn delayed(delay: Duration, notice: impl Into<String>) -> Self {
        Self {
            mode: TerminalMode::Delayed,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            notice: notice.into(),
            ..Self::default()
        }
    }

    /// Builds the terminal effect this configuration describes.
    #[must_use]
    pub fn effect(&self) -> TerminalEffect {
        match self.mode {
            TerminalMode::Immediate => TerminalEffect::Immediate {
                asset: self.asset.clone(),
                caption: self.caption.clone(),
            },
            TerminalMode::Delayed => TerminalEffect::Delayed {
                delay_ms: self.delay_ms,
                notice: self.notice.clone(),
                reset_after: self.reset_after,
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            TerminalMode::Immediate if self.asset.trim().is_empty() => {
                Err(ConfigError::invalid("terminal.asset", "cannot be empty"))
            }
            TerminalMode::Delayed if self.delay_ms == 0 => Err(ConfigError::invalid(
                "terminal.delay_ms",
                "must be positive in delayed mode",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = FormConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FormConfig::default());
        assert_eq!(config.palette_size, 100);
        assert_eq!(config.terminal.effect(), TerminalEffect::immediate("bsod.png"));
    }

    #[test]
    fn test_delayed_mode_from_json() {
        let config = FormConfig::from_json_str(
            r#"{"palette_seed": 42, "terminal": {"mode": "delayed", "delay_ms": 1500}}"#,
        )
        .unwrap();

        assert_eq!(config.palette_seed, Some(42));
        assert_eq!(
            config.terminal.effect(),
            TerminalEffect::Delayed {
                delay_ms: 1500,
                notice: default_notice(),
                reset_after: true,
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = FormConfig::from_json_str(r#"{"palette_size": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "palette_size", .. }));

        let err =
            FormConfig::from_json_str(r#"{"terminal": {"mode": "delayed", "delay_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terminal.delay_ms", .. }));
    }

    #[test]
    fn test_palette_size_is_capped() {
        let err = FormConfig::from_json_str(r#"{"palette_size": 16000000}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "palette_size", .. }));

        let at_cap = format!(r#"{{"palette_size": {MAX_PALETTE_SIZE}}}"#);
        assert!(FormConfig::from_json_str(&at_cap).is_ok());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = FormConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Sign up", "arithmetic_answer": "42"}}"#).unwrap();

        let config = FormConfig::from_file(file.path()).unwrap();
        assert_eq!(config.title, "Sign up");
        assert_eq!(config.arithmetic_answer, "42");
    }

    #[test]
    fn test_missing_file() {
        let err = FormConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_delayed_builder() {
        let terminal = TerminalConfig::delayed(Duration::from_secs(2), "nope");
        assert_eq!(terminal.mode, TerminalMode::Delayed);
        assert_eq!(terminal.delay_ms, 2000);
    }
}
