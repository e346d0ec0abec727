//! Error types shared by the server modules

use std::io;
use thiserror::Error;

/// Rejected game configuration. Returned instead of looping or panicking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("code digits must be between {min} and {max}, got {found}")]
    DigitWidthOutOfRange { found: u8, min: u8, max: u8 },
    #[error("hard difficulty needs at least 3 digits, got {0}")]
    HardNeedsThreeDigits(u8),
    #[error("at least one player is required")]
    NoPlayers,
    #[error("configured for {expected} players but {connected} are connected")]
    PlayerCountMismatch { expected: usize, connected: usize },
}

/// A guess that is not exactly digit-width numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("guess must contain exactly {expected} digits")]
    WrongLength { expected: u8, found: usize },
    #[error("guess must contain only digits")]
    NonDigit,
}

/// Outcome of a failed read from a player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("read deadline elapsed")]
    Timeout,
    #[error("connection lost: {0}")]
    Disconnected(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("player {player} disconnected: {reason}")]
    Disconnected { player: u32, reason: String },
    #[error("coordinator has already stopped")]
    Stopped,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
