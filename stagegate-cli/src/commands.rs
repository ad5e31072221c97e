//! Parsing of the line-oriented command language read from stdin.

use anyhow::{anyhow, bail, Result};
use stagegate::core::FormInput;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type text into a text or password stage.
    Set { stage_id: String, text: String },
    /// Choose an option of a select stage.
    Pick { stage_id: String, option: String },
    /// Check a checkbox.
    Check { stage_id: String },
    /// Uncheck a checkbox.
    Uncheck { stage_id: String },
    /// Press a button.
    Click { stage_id: String },
    /// Print the current view.
    Show,
    /// Print the command list.
    Help,
    /// Leave the form.
    Quit,
}

pub const HELP: &str = "\
commands:
  set <id> <text>       type into a text field (text may contain spaces)
  pick <id> <option>    choose a dropdown option
  check <id>            check a checkbox
  uncheck <id>          uncheck a checkbox
  click <id>            press a button
  show                  print the form
  help                  print this list
  quit                  leave";

impl Command {
    /// Converts the command into a form input, if it is one.
    pub fn into_input(self) -> Option<FormInput> {
        match self {
            Self::Set { stage_id, text } => Some(FormInput::text(stage_id, text)),
            Self::Pick { stage_id, option } => Some(FormInput::select(stage_id, option)),
            Self::Check { stage_id } => Some(FormInput::toggle(stage_id, true)),
            Self::Uncheck { stage_id } => Some(FormInput::toggle(stage_id, false)),
            Self::Click { stage_id } => Some(FormInput::activate(stage_id)),
            Self::Show | Self::Help | Self::Quit => None,
        }
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let (id, argument) = match rest.split_once(char::is_whitespace) {
        Some((id, argument)) => (id.to_string(), argument.trim_start().to_string()),
        None => (rest.to_string(), String::new()),
    };
    let require_id = || {
        if id.is_empty() {
            Err(anyhow!("'{verb}' needs a stage id"))
        } else {
            Ok(id.clone())
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        // An empty text is a legitimate value: it clears the field.
        "set" => Command::Set {
            stage_id: require_id()?,
            text: argument,
        },
        "pick" => {
            let stage_id = require_id()?;
            if argument.is_empty() {
                bail!("'pick' needs an option");
            }
            Command::Pick {
                stage_id,
                option: argument,
            }
        }
        "check" => Command::Check {
            stage_id: require_id()?,
        },
        "uncheck" => Command::Uncheck {
            stage_id: require_id()?,
        },
        "click" => Command::Click {
            stage_id: require_id()?,
        },
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(command))
}
