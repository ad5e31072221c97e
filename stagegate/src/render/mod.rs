//! The output boundary: what a session shows.
//!
//! A [`View`] is either the ordered list of visible widgets or the terminal
//! full-screen replacement. `Display` renders it as plain text.

use crate::core::{InputValue, StageKind, StageStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Select stages with more options than this are summarized.
const MAX_LISTED_OPTIONS: usize = 8;

/// One visible widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// The stage id.
    pub id: String,
    /// The widget kind.
    pub kind: StageKind,
    /// Display prompt.
    pub prompt: String,
    /// Options, for selects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Whether the widget is pending or complete.
    pub status: StageStatus,
    /// What the widget currently displays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed: Option<InputValue>,
}

/// The full-screen terminal failure display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalView {
    /// Opaque reference to the failure asset, when one is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Text shown on the failure screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Everything the user currently sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// The form with its visible widgets in registry order.
    Form {
        /// Form title.
        title: String,
        /// Visible widgets.
        widgets: Vec<Widget>,
    },
    /// The terminal replacement view.
    Terminal(TerminalView),
}

impl View {
    /// Returns true if this is the terminal view.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Returns the visible widgets, empty for the terminal view.
    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        match self {
            Self::Form { widgets, .. } => widgets,
            Self::Terminal(_) => &[],
        }
    }

    /// Returns the visible widget with this id.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets().iter().find(|w| w.id == id)
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.status == StageStatus::Complete { "x" } else { " " };
        match self.kind {
            StageKind::Header => write!(f, "== {} ==", self.prompt),
            StageKind::ActionButton => write!(f, "    <{}>  ({})", self.prompt, self.id),
            StageKind::Checkbox => {
                let checked = matches!(self.displayed, Some(InputValue::Toggle(true)));
                let check = if checked { "x" } else { " " };
                write!(f, "[{mark}] [{check}] {}  ({})", self.prompt, self.id)
            }
            StageKind::PasswordInput => {
                let masked = self
                    .displayed
                    .as_ref()
                    .and_then(InputValue::as_str)
                    .map(|s| "*".repeat(s.chars().count()))
                    .unwrap_or_default();
                write!(f, "[{mark}] {}: {masked}  ({})", self.prompt, self.id)
            }
            StageKind::TextInput => {
                let shown = self.displayed.as_ref().and_then(InputValue::as_str).unwrap_or("");
                write!(f, "[{mark}] {}: {shown}  ({})", self.prompt, self.id)
            }
            StageKind::SingleSelect => {
                let shown = self.displayed.as_ref().and_then(InputValue::as_str).unwrap_or("-");
                write!(f, "[{mark}] {} > {shown}  ({})", self.prompt, self.id)?;
                if self.options.len() > MAX_LISTED_OPTIONS {
                    write!(f, "\n      {} options, e.g. {}", self.options.len(), self.options[..3].join(" | "))
                } else {
                    write!(f, "\n      {}", self.options.join(" | "))
                }
            }
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form { title, widgets } => {
                writeln!(f, "{title}")?;
                for widget in widgets {
                    writeln!(f, "  {widget}")?;
                }
                Ok(())
            }
            Self::Terminal(terminal) => {
                writeln!(f, "!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!")?;
                if let Some(asset) = &terminal.asset {
                    writeln!(f, "  [{asset}]")?;
                }
                if let Some(message) = &terminal.message {
                    writeln!(f, "  {message}")?;
                }
                writeln!(f, "!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!")
            }
        }
    }
}
