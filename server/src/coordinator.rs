//! Turn scheduling, timeout handling and recovery for one game table
//!
//! The coordinator runs as a single sequential task and is the only owner of
//! the active [`GameSession`], the [`TurnState`] and the [`Analytics`], so
//! none of them need locking. Exactly one read is pending at a time during
//! normal play, which is what keeps feedback broadcasts in acceptance order.
//!
//! ## States
//!
//! - `AwaitingPlayers`: constructed, nothing announced yet.
//! - `Playing`: the player at `TurnState::current` is asked for a guess.
//! - `Recovery`: every player timed out in a row; the first player to send
//!   anything gets to play, regardless of turn order.
//! - `Disconnected`: terminal. Any non-timeout read failure ends the run.
//!
//! A disconnect is never isolated to one player: the whole run stops and the
//! caller decides what to do with the remaining connections.

use crate::analytics::Analytics;
use crate::code::Code;
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError, ReadError, ValidationError};
use crate::feedback::{self, Feedback};
use crate::messenger::Messenger;
use crate::secret;
use crate::validation::parse_guess;
use log::{debug, info, warn};
use rand::Rng;
use shared::{Message, MessageKind};
use std::time::Duration;

/// Where the table is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayers,
    Playing,
    Recovery,
    Disconnected,
}

/// Whose turn it is and how many turns in a row have timed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    current: usize,
    consecutive_timeouts: usize,
}

impl TurnState {
    /// Starts a fresh chain with `current` holding the turn.
    pub fn new(current: usize) -> Self {
        Self {
            current,
            consecutive_timeouts: 0,
        }
    }

    /// Turn index (not player id) of the player being asked for a guess.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Timeouts since the last accepted guess.
    ///
    /// Only a timeout increments this and only an accepted guess clears it;
    /// rejected input leaves it alone.
    pub fn consecutive_timeouts(&self) -> usize {
        self.consecutive_timeouts
    }

    /// Whether the timeout chain covers every player.
    pub fn needs_recovery(&self, player_count: usize) -> bool {
        self.consecutive_timeouts == player_count
    }

    fn pass_to(&mut self, index: usize, player_count: usize) {
        self.current = index % player_count;
    }

    fn record_timeout(&mut self) -> usize {
        self.consecutive_timeouts += 1;
        self.consecutive_timeouts
    }

    fn reset_timeouts(&mut self) {
        self.consecutive_timeouts = 0;
    }
}

/// One round, from secret generation to a win
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    secret: Code,
    guess_count: u32,
}

impl GameSession {
    fn new(secret: Code) -> Self {
        Self {
            secret,
            guess_count: 0,
        }
    }

    /// The code players are trying to break.
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    /// Accepted guesses this round, counting every player.
    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }
}

/// What a single call to [`Coordinator::play_turn`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input failed validation; the turn stays with `player`.
    Rejected {
        player: u32,
        error: ValidationError,
    },
    Scored {
        player: u32,
        feedback: Feedback,
    },
    Won {
        player: u32,
        secret: u32,
        guesses: u32,
    },
    TimedOut {
        player: u32,
        consecutive: usize,
    },
}

/// Drives one table over a [`Messenger`], drawing secrets and hints from `R`
pub struct Coordinator<M, R> {
    config: GameConfig,
    messenger: M,
    rng: R,
    players: Vec<u32>,
    phase: Phase,
    turn: TurnState,
    session: GameSession,
    analytics: Analytics,
}

impl<M: Messenger, R: Rng> Coordinator<M, R> {
    /// Builds a coordinator for the players already attached to `messenger`.
    ///
    /// The first secret is generated here, so configuration problems surface
    /// before any player is notified. The opening turn is drawn from `rng`.
    pub fn new(config: GameConfig, messenger: M, mut rng: R) -> Result<Self, GameError> {
        let players = messenger.player_ids();
        if players.len() != config.player_count() {
            return Err(ConfigError::PlayerCountMismatch {
                expected: config.player_count(),
                connected: players.len(),
            }
            .into());
        }

        let code = secret::generate(config.digit_width(), config.difficulty(), &mut rng)?;
        debug!("New secret: {}", code);
        let first = rng.gen_range(0..players.len());

        Ok(Self {
            config,
            messenger,
            rng,
            players,
            phase: Phase::AwaitingPlayers,
            turn: TurnState::new(first),
            session: GameSession::new(code),
            analytics: Analytics::new(),
        })
    }

    /// Overrides the randomly drawn opening turn.
    pub fn with_first_turn(mut self, index: usize) -> Self {
        self.turn.pass_to(index, self.players.len());
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot of the turn pointer and timeout chain.
    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    /// The round in progress. Replaced wholesale after every win.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Statistics across every round this coordinator has played.
    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Player ids in turn order, as reported by the messenger at construction.
    pub fn players(&self) -> &[u32] {
        &self.players
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Mutable access to the messenger, mainly for feeding scripted input.
    pub fn messenger_mut(&mut self) -> &mut M {
        &mut self.messenger
    }

    /// Plays turns until a player disconnects.
    pub async fn run(&mut self) -> Result<(), GameError> {
        loop {
            self.play_turn().await?;
        }
    }

    /// Advances the state machine by one read.
    pub async fn play_turn(&mut self) -> Result<TurnOutcome, GameError> {
        match self.phase {
            Phase::Disconnected => Err(GameError::Stopped),
            Phase::AwaitingPlayers => {
                self.announce_start().await;
                self.normal_turn().await
            }
            Phase::Playing => self.normal_turn().await,
            Phase::Recovery => self.recover().await,
        }
    }

    async fn announce_start(&mut self) {
        info!(
            "Game starting: {} players, {} digits, {} difficulty",
            self.players.len(),
            self.config.digit_width(),
            self.config.difficulty()
        );
        self.broadcast(
            MessageKind::Info,
            "All players connected. Game starting now!\n".to_string(),
        )
        .await;
        self.broadcast(MessageKind::NewGame, "New game started!\n".to_string())
            .await;
        self.phase = Phase::Playing;
    }

    async fn normal_turn(&mut self) -> Result<TurnOutcome, GameError> {
        let index = self.turn.current();
        let player = self.players[index];
        self.notify_turns(player).await;

        let deadline = self.config.turn_deadline();
        let read = self.messenger.read_line(player, deadline).await;

        match read {
            Ok(line) => match parse_guess(&line, self.config.digit_width()) {
                Ok(guess) => self.accept_guess(index, guess).await,
                Err(error) => {
                    self.reject(player, error.clone()).await;
                    Ok(TurnOutcome::Rejected { player, error })
                }
            },
            Err(ReadError::Timeout) => self.handle_timeout(index).await,
            Err(ReadError::Disconnected(reason)) => Err(self.disconnect(player, reason).await),
        }
    }

    async fn notify_turns(&mut self, current: u32) {
        for player in self.players.clone() {
            let message = if player == current {
                Message::new(MessageKind::Turn, "Your turn!\n")
            } else {
                Message::new(
                    MessageKind::Wait,
                    format!("Waiting for Player {}...\n", current),
                )
            };
            self.messenger.send(player, message).await;
        }
    }

    async fn handle_timeout(&mut self, index: usize) -> Result<TurnOutcome, GameError> {
        let player = self.players[index];
        let consecutive = self.turn.record_timeout();
        warn!("Player {} timed out ({} in a row)", player, consecutive);

        self.broadcast(
            MessageKind::Timeout,
            format!("Player {} ran out of time and forfeited the turn!\n", player),
        )
        .await;

        let drained = self
            .messenger
            .drain(player, self.config.drain_window())
            .await;
        if drained > 0 {
            debug!("Drained {} late line(s) from player {}", drained, player);
        }

        if self.turn.needs_recovery(self.players.len()) {
            self.phase = Phase::Recovery;
        } else {
            self.turn.pass_to(index + 1, self.players.len());
        }

        Ok(TurnOutcome::TimedOut {
            player,
            consecutive,
        })
    }

    async fn recover(&mut self) -> Result<TurnOutcome, GameError> {
        info!("All players timed out, entering recovery");
        self.broadcast(
            MessageKind::Recovery,
            "All players timed out. Waiting for ANY player to resume...\n".to_string(),
        )
        .await;

        // The notice goes out once; a bounded wait that lapses just waits again.
        let (player, line) = loop {
            match self.messenger.read_any().await {
                (player, Ok(line)) => break (player, line),
                (_, Err(ReadError::Timeout)) => continue,
                (player, Err(ReadError::Disconnected(reason))) => {
                    return Err(self.disconnect(player, reason).await)
                }
            }
        };

        let Some(index) = self.players.iter().position(|id| *id == player) else {
            return Err(self
                .disconnect(player, "input from an unknown player".to_string())
                .await);
        };

        info!("Player {} resumed the game", player);
        self.phase = Phase::Playing;
        self.turn.reset_timeouts();

        match parse_guess(&line, self.config.digit_width()) {
            Ok(guess) => self.accept_guess(index, guess).await,
            Err(error) => {
                self.reject(player, error.clone()).await;
                self.turn.pass_to(index, self.players.len());
                Ok(TurnOutcome::Rejected { player, error })
            }
        }
    }

    async fn reject(&mut self, player: u32, error: ValidationError) {
        warn!("Rejected input from player {}: {}", player, error);
        self.messenger
            .send(
                player,
                Message::new(MessageKind::Info, format!("Invalid input: {}\n", error)),
            )
            .await;
    }

    async fn accept_guess(&mut self, index: usize, guess: Code) -> Result<TurnOutcome, GameError> {
        let player = self.players[index];
        self.turn.reset_timeouts();
        self.session.guess_count += 1;

        let feedback = feedback::score(&self.session.secret, &guess, &mut self.rng);

        if feedback.is_win(self.config.digit_width()) {
            let secret = self.session.secret.value();
            let guesses = self.session.guess_count;
            self.finish_session(player).await?;
            self.turn.pass_to(index + 1, self.players.len());
            return Ok(TurnOutcome::Won {
                player,
                secret,
                guesses,
            });
        }

        let text = format!(
            "{}player: {}\nNumber guessed: {}\nCorrectly placed: {}\nWrongly placed: {}\nHint: {}\n",
            timestamp_prefix(),
            player,
            guess,
            feedback.correct_place,
            feedback.wrong_place,
            feedback.hint
        );
        self.broadcast(MessageKind::Result, text).await;
        self.turn.pass_to(index + 1, self.players.len());

        Ok(TurnOutcome::Scored { player, feedback })
    }

    /// Win sequence: record, announce, settle, then deal a new secret.
    async fn finish_session(&mut self, winner: u32) -> Result<(), GameError> {
        let value = self.session.secret.value();
        self.analytics
            .record_win(winner, &self.players, value, self.session.guess_count);
        info!(
            "Player {} won in {} guess(es)\n{}",
            winner, self.session.guess_count, self.analytics
        );

        self.broadcast(
            MessageKind::Win,
            format!(
                "{}Player {} won! Secret was {}\n",
                timestamp_prefix(),
                winner,
                self.session.secret
            ),
        )
        .await;
        self.broadcast(
            MessageKind::NewGame,
            format!(
                "New game starting in {} seconds...\n",
                settle_seconds(self.config.settle_delay())
            ),
        )
        .await;

        tokio::time::sleep(self.config.settle_delay()).await;

        let code = secret::generate(
            self.config.digit_width(),
            self.config.difficulty(),
            &mut self.rng,
        )?;
        debug!("New secret: {}", code);
        self.session = GameSession::new(code);

        self.broadcast(MessageKind::NewGame, "New game started!\n".to_string())
            .await;
        Ok(())
    }

    async fn disconnect(&mut self, player: u32, reason: String) -> GameError {
        warn!("Player {} disconnected: {}", player, reason);
        self.phase = Phase::Disconnected;
        self.broadcast(
            MessageKind::Info,
            format!("Player {} disconnected. Game over.\n", player),
        )
        .await;
        GameError::Disconnected { player, reason }
    }

    async fn broadcast(&mut self, kind: MessageKind, text: String) {
        self.messenger.broadcast(Message::new(kind, text)).await;
    }
}

/// Whole seconds print bare ("3"), anything else with one decimal ("0.5").
fn settle_seconds(delay: Duration) -> String {
    if delay.subsec_millis() == 0 {
        delay.as_secs().to_string()
    } else {
        format!("{:.1}", delay.as_secs_f64())
    }
}

fn timestamp_prefix() -> String {
    format!("TIME: {} - ", chrono::Local::now().format("%H:%M:%S"))
}
