use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

/// Literal a player sends to leave the game voluntarily.
pub const EXIT_COMMAND: &str = "exit";

/// Tag carried by every server-to-player message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Turn,
    Wait,
    Recovery,
    Result,
    Win,
    NewGame,
    Timeout,
    Info,
}

impl MessageKind {
    pub const ALL: [MessageKind; 8] = [
        MessageKind::Turn,
        MessageKind::Wait,
        MessageKind::Recovery,
        MessageKind::Result,
        MessageKind::Win,
        MessageKind::NewGame,
        MessageKind::Timeout,
        MessageKind::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Turn => "TURN",
            Self::Wait => "WAIT",
            Self::Recovery => "RECOVERY",
            Self::Result => "RESULT",
            Self::Win => "WIN",
            Self::NewGame => "NEWGAME",
            Self::Timeout => "TIMEOUT",
            Self::Info => "INFO",
        }
    }

    /// Whether a player receiving this message may submit a guess.
    pub fn grants_input(&self) -> bool {
        matches!(self, Self::Turn | Self::Recovery)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single newline-delimited message sent from the server to a player.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encodes a message as one JSON line, terminator included.
pub fn encode_line(message: &Message) -> Result<String, CodecError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one line produced by [`encode_line`]. Trailing whitespace is ignored.
pub fn decode_line(line: &str) -> Result<Message, CodecError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

/// Normalises a raw inbound line: strips the terminator and surrounding whitespace.
pub fn clean_input(line: &str) -> &str {
    line.trim()
}

pub fn is_exit_command(line: &str) -> bool {
    clean_input(line) == EXIT_COMMAND
}
