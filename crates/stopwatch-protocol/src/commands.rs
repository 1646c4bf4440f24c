//! Commands that can be issued to the stopwatch.
//!
//! Every command is a single character. Four of them are transmitted to the
//! device as one raw byte; the exit command never reaches the wire and only
//! ends the host session.

use crate::error::{ProtocolError, ProtocolResult};

/// The five commands understood by the control interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Start counting (`g`).
    Go,
    /// Stop counting (`s`).
    Stop,
    /// Clear the count (`c`).
    Clear,
    /// Read the current count (`r`).
    Read,
    /// End the host session (`e`).
    Exit,
}

impl CommandKind {
    /// All commands, in banner order.
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Go,
        CommandKind::Stop,
        CommandKind::Clear,
        CommandKind::Read,
        CommandKind::Exit,
    ];

    /// Classify a character, ignoring case.
    pub fn from_char(c: char) -> Option<CommandKind> {
        match c.to_ascii_lowercase() {
            'g' => Some(CommandKind::Go),
            's' => Some(CommandKind::Stop),
            'c' => Some(CommandKind::Clear),
            'r' => Some(CommandKind::Read),
            'e' => Some(CommandKind::Exit),
            _ => None,
        }
    }

    /// The lowercase character for this command.
    pub fn as_char(&self) -> char {
        match self {
            CommandKind::Go => 'g',
            CommandKind::Stop => 's',
            CommandKind::Clear => 'c',
            CommandKind::Read => 'r',
            CommandKind::Exit => 'e',
        }
    }

    /// Operator feedback printed for this command.
    pub fn notice(&self) -> &'static str {
        match self {
            CommandKind::Go => "start",
            CommandKind::Stop => "stop",
            CommandKind::Clear => "clear",
            CommandKind::Read => "receive",
            CommandKind::Exit => "goodbye!",
        }
    }

    /// Short description used in the startup banner.
    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Go => "go",
            CommandKind::Stop => "stop",
            CommandKind::Clear => "clear",
            CommandKind::Read => "receive time",
            CommandKind::Exit => "exit",
        }
    }

    /// Whether the notice is printed before the command byte is written.
    ///
    /// Go, stop and clear announce themselves first; read announces after
    /// its byte is on the wire, just before waiting for the reply.
    pub fn notice_before_write(&self) -> bool {
        !matches!(self, CommandKind::Read)
    }
}

/// A classified command together with the literal character that was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    typed: char,
}

impl Command {
    /// Parse one line of operator input.
    ///
    /// The line must already have its line terminator removed. Exactly one
    /// character is accepted; surrounding whitespace is not trimmed.
    pub fn parse(line: &str) -> ProtocolResult<Command> {
        let mut chars = line.chars();
        let (Some(typed), None) = (chars.next(), chars.next()) else {
            return Err(ProtocolError::InvalidCommand(line.to_string()));
        };

        CommandKind::from_char(typed)
            .map(|kind| Command { kind, typed })
            .ok_or_else(|| ProtocolError::InvalidCommand(line.to_string()))
    }

    /// The classified command.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The character exactly as typed.
    pub fn as_char(&self) -> char {
        self.typed
    }

    /// The byte to transmit, or `None` for the exit command.
    ///
    /// The typed character is passed through without case normalization.
    pub fn wire_byte(&self) -> Option<u8> {
        match self.kind {
            CommandKind::Exit => None,
            // `from_char` only accepts ASCII letters.
            _ => Some(self.typed as u8),
        }
    }

    /// Whether the device answers this command with a timestamp.
    pub fn expects_reply(&self) -> bool {
        self.kind == CommandKind::Read
    }
}

/// Render the startup banner listing every command.
pub fn banner() -> String {
    let mut text = String::from("Stopwatch Control Interface:\n");
    for kind in CommandKind::ALL {
        let c = kind.as_char();
        text.push_str(&format!(
            "Enter {} or {} to {}\n",
            c,
            c.to_ascii_uppercase(),
            kind.description()
        ));
    }
    text
}
