//! Special commands parser for interactive chat mode
//!
//! This module parses commands that can be entered during an interactive
//! chat session instead of a question. Special commands allow users to:
//! - Re-display the session history
//! - Start a fresh session
//! - View session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. `exit` and
//! `quit` are also accepted without the slash.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("{command} does not take an argument (got: {arg})")]
    UnexpectedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session rather than being sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display every turn of the current session with timestamps
    History,

    /// Discard the transcript and start a new session
    Clear,

    /// Display model, session id, turn count and state
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the model as a question.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input is a single `/word`
/// that is not a known command, and `CommandError::UnexpectedArgument` if
/// a known command is followed by extra text. Any other input starting
/// with "/" (a path, or an unknown word followed by more text) is a
/// question.
///
/// # Examples
///
/// ```
/// use medchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/history").unwrap(), SpecialCommand::History);
/// assert_eq!(parse_special_command("QUIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(
///     parse_special_command("How do I print?").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let parsed = match command {
        "/history" | "/h" => SpecialCommand::History,
        "/clear" | "/reset" | "/new" => SpecialCommand::Clear,
        "/status" => SpecialCommand::ShowStatus,
        "/help" | "/?" => SpecialCommand::Help,
        "/exit" | "/quit" | "/q" => SpecialCommand::Exit,
        // Paths and slash-led sentences are questions
        _ if arg.is_some() || command[1..].contains('/') => return Ok(SpecialCommand::None),
        _ => return Err(CommandError::UnknownCommand(trimmed.to_string())),
    };

    match arg {
        Some(arg) => Err(CommandError::UnexpectedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
        None => Ok(parsed),
    }
}

/// Help text for the interactive session
pub fn help_text() -> &'static str {
    r#"
Special Commands for Interactive Chat
=====================================

SESSION:
  /history        - Show every question and answer in this session
  /clear          - Start a new session (aliases: /reset, /new)
  /status         - Show model, session id and turn count

OTHER:
  /help           - Show this help
  /exit           - Leave the chat (also: exit, quit, Ctrl-D)

Anything else is sent to the model as a question. Each question is
answered on its own; earlier turns are not sent along with it.
Press Ctrl-C while an answer is being generated to abandon it.
"#
}
