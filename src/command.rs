//! The fixed command set and its argument validation.
//!
//! Everything that can be rejected without talking to iTerm2 is rejected
//! here, so an invalid invocation never opens a connection.

use crate::control::control_byte;
use crate::error::UsageError;

/// One validated bridge command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send literal text to the session's input.
    WriteText(String),
    /// Read the visible screen.
    GetContent,
    /// Send one control byte.
    SendControl { name: String, byte: u8 },
    /// Report the session's controlling terminal.
    GetTty,
    /// Report whether the session is running a foreground job.
    IsProcessing,
}

impl Command {
    /// Build a command from the positional `<command> [<argument>]` pair.
    pub fn parse(name: Option<&str>, argument: Option<&str>) -> Result<Self, UsageError> {
        let Some(name) = name else {
            return Err(UsageError::NoCommand);
        };
        match name {
            "write_text" => {
                let text = argument.ok_or(UsageError::NoText)?;
                Ok(Self::WriteText(text.to_string()))
            }
            "get_content" => Ok(Self::GetContent),
            "send_control" => {
                let code = argument.ok_or(UsageError::NoControlCharacter)?;
                let byte = control_byte(code)
                    .ok_or_else(|| UsageError::UnknownControlCharacter(code.to_string()))?;
                Ok(Self::SendControl {
                    name: code.to_string(),
                    byte,
                })
            }
            "get_tty" => Ok(Self::GetTty),
            "is_processing" => Ok(Self::IsProcessing),
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }

    /// Wire name of this command, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WriteText(_) => "write_text",
            Self::GetContent => "get_content",
            Self::SendControl { .. } => "send_control",
            Self::GetTty => "get_tty",
            Self::IsProcessing => "is_processing",
        }
    }
}
