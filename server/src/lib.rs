//! # Code Breaker Server Library
//!
//! This library provides the coordinating process for the networked
//! code-breaking game. It holds the hidden code, arbitrates guesses
//! submitted in turn by the connected players, and answers each guess with
//! scored feedback and one qualitative hint.
//!
//! ## Core Responsibilities
//!
//! ### Turn Arbitration
//! Exactly one player is asked for a guess at a time. A turn ends with an
//! accepted guess or with the per-turn deadline; invalid input is answered
//! in place and the same player is asked again. When every player has timed
//! out in an unbroken chain the table enters recovery and the first player
//! to send anything resumes the game.
//!
//! ### Deterministic Game Logic
//! Secret generation and scoring take the random source as a parameter, so
//! a seeded generator reproduces secrets, scores and hints exactly.
//!
//! ### Session Statistics
//! Wins, losses and the hardest secrets are tracked for the lifetime of the
//! process and logged after every game.
//!
//! ## Module Organization
//!
//! ### Game Logic
//! - `code`: fixed-width digit sequences
//! - `secret`: secret generation per difficulty tier
//! - `validation`: raw guess text to a code
//! - `feedback`: two-pass scoring and the hint battery
//! - `analytics`: append-only win/loss counters
//!
//! ### Orchestration
//! - `coordinator`: the turn/timeout/recovery state machine
//! - `messenger`: the player I/O seam and its TCP implementation
//! - `lobby`: id assignment while the table fills
//! - `network`: listener setup and the top-level run
//!
//! ### Supporting Modules
//! - `config`: validated, immutable game settings
//! - `error`: typed errors for every failure kind
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::{Difficulty, GameConfig};
//! use server::network::Server;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::new(4, Difficulty::Medium, 2, Duration::from_secs(30))?;
//!     let server = Server::bind("0.0.0.0:8080", config).await?;
//!
//!     // Blocks until two players joined, then plays until one disconnects
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Known Limitation
//!
//! A single player's disconnect ends the whole run; players are not removed
//! individually.

pub mod analytics;
pub mod code;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod feedback;
pub mod lobby;
pub mod messenger;
pub mod network;
pub mod secret;
pub mod validation;
