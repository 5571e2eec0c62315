//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands available during interactive
//! sessions. Special commands manage local state (sessions, attachments,
//! display) instead of being sent to the research assistant:
//! - Create and switch between chat sessions
//! - Queue file attachments for the next send
//! - Trigger learning-path generation
//! - Display help or exit
//!
//! Commands are prefixed with `/` and are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify local session state or display information,
/// rather than being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Create a fresh session and make it active
    NewSession,

    /// List all sessions with the active one marked
    ListSessions,

    /// Switch to the numbered session from the `/sessions` listing
    SwitchSession(usize),

    /// Queue a file attachment for the next send
    Attach(String),

    /// Ask the assistant to generate a learning path for a topic
    ///
    /// An empty topic falls back to the current conversation topic.
    LearningPath(String),

    /// Toggle colored terminal output
    ToggleColor,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the assistant as a regular message.
    None,
}

/// Parse a user input string into a special command
///
/// Checks if the input matches any special command pattern. Commands are
/// case-insensitive; arguments keep their original casing.
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for non-commands. Returns Err(CommandError) for invalid commands or
/// invalid arguments.
///
/// # Examples
///
/// ```
/// use swarmchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/new").unwrap();
/// assert_eq!(cmd, SpecialCommand::NewSession);
///
/// let cmd = parse_special_command("/switch 2").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchSession(2));
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/sessions" => Ok(SpecialCommand::ListSessions),

        "/switch" => Err(CommandError::MissingArgument {
            command: "/switch".to_string(),
            usage: "/switch <number>".to_string(),
        }),
        _ if lower.starts_with("/switch ") => {
            let arg = trimmed[8..].trim();
            match arg.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(SpecialCommand::SwitchSession(n)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/switch".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        "/attach" => Err(CommandError::MissingArgument {
            command: "/attach".to_string(),
            usage: "/attach <path>".to_string(),
        }),
        _ if lower.starts_with("/attach ") => {
            Ok(SpecialCommand::Attach(trimmed[8..].trim().to_string()))
        }

        "/path" => Ok(SpecialCommand::LearningPath(String::new())),
        _ if lower.starts_with("/path ") => {
            Ok(SpecialCommand::LearningPath(trimmed[6..].trim().to_string()))
        }

        "/color" => Ok(SpecialCommand::ToggleColor),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the interactive session
pub fn print_help() {
    println!("Available commands:");
    println!("  /new              Create a new session and switch to it");
    println!("  /sessions         List sessions (active one marked with *)");
    println!("  /switch <number>  Switch to a session from the listing");
    println!("  /attach <path>    Queue a file attachment for the next send");
    println!("  /path [topic]     Generate a learning path for a topic");
    println!("  /color            Toggle colored output");
    println!("  /help             Show this help");
    println!("  /exit             Leave the chat (also: exit, quit)");
    println!();
    println!("Anything else is sent to the research assistant.");
}
