//! Immutable game configuration consumed by the generator, scorer and coordinator

use crate::error::ConfigError;
use clap::ValueEnum;
use std::fmt;
use std::time::Duration;

pub const MIN_DIGITS: u8 = 2;
pub const MAX_DIGITS: u8 = 8;

/// Smallest width for which a hard secret can exist.
pub const MIN_HARD_DIGITS: u8 = 3;

pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_millis(50);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the width/difficulty pair on its own, before any secret is drawn.
pub fn check_code_shape(digit_width: u8, difficulty: Difficulty) -> Result<(), ConfigError> {
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digit_width) {
        return Err(ConfigError::DigitWidthOutOfRange {
            found: digit_width,
            min: MIN_DIGITS,
            max: MAX_DIGITS,
        });
    }
    if difficulty == Difficulty::Hard && digit_width < MIN_HARD_DIGITS {
        return Err(ConfigError::HardNeedsThreeDigits(digit_width));
    }
    Ok(())
}

/// Validated settings for one coordinator run
///
/// Built once through [`GameConfig::new`] and passed by reference afterwards,
/// so no two sessions ever share mutable width or range state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    digit_width: u8,
    difficulty: Difficulty,
    player_count: usize,
    turn_timeout: Duration,
    drain_window: Duration,
    settle_delay: Duration,
}

impl GameConfig {
    pub fn new(
        digit_width: u8,
        difficulty: Difficulty,
        player_count: usize,
        turn_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        check_code_shape(digit_width, difficulty)?;
        if player_count == 0 {
            return Err(ConfigError::NoPlayers);
        }

        Ok(Self {
            digit_width,
            difficulty,
            player_count,
            turn_timeout,
            drain_window: DEFAULT_DRAIN_WINDOW,
            settle_delay: DEFAULT_SETTLE_DELAY,
        })
    }

    pub fn with_drain_window(mut self, drain_window: Duration) -> Self {
        self.drain_window = drain_window;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn digit_width(&self) -> u8 {
        self.digit_width
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn turn_timeout(&self) -> Duration {
        self.turn_timeout
    }

    /// Deadline for a normal turn read. A lone player is never timed out.
    pub fn turn_deadline(&self) -> Option<Duration> {
        (self.player_count > 1).then_some(self.turn_timeout)
    }

    pub fn drain_window(&self) -> Duration {
        self.drain_window
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}
