//! Line commands read from stdin.

use fieldbind::signup::names;
use thiserror::Error;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace a field's value, as if the user typed it.
    Type {
        /// Registered field name.
        field: &'static str,
        /// New raw value.
        value: String,
    },
    /// Print every field's value and error.
    Show,
    /// Validate and print the payload.
    Submit,
    /// Clear every field.
    Reset,
    /// Leave the demo.
    Quit,
}

/// Errors from parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown field '{0}' (expected first, last, email, password or confirm)")]
    UnknownField(String),

    #[error("Unknown command '{0}' (expected field=value, show, submit, reset or quit)")]
    UnknownCommand(String),
}

fn field_name(alias: &str) -> Option<&'static str> {
    match alias {
        "first" | names::FIRST_NAME => Some(names::FIRST_NAME),
        "last" | names::LAST_NAME => Some(names::LAST_NAME),
        "email" => Some(names::EMAIL),
        "password" => Some(names::PASSWORD),
        "confirm" | names::CONFIRM => Some(names::CONFIRM),
        _ => None,
    }
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some((field, value)) = line.split_once('=') {
            let field = field.trim();
            let name = field_name(field).ok_or_else(|| ParseError::UnknownField(field.to_string()))?;
            return Ok(Self::Type {
                field: name,
                value: value.to_string(),
            });
        }

        match line.trim() {
            "show" => Ok(Self::Show),
            "submit" => Ok(Self::Submit),
            "reset" => Ok(Self::Reset),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}
