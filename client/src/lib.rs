//! # Code Breaker Client Library
//!
//! A thin terminal front end for the code-breaking game. It holds no game
//! logic: the server decides turns, validates guesses and scores them.
//!
//! ## Event Multiplexing
//!
//! Two independent sources feed a single-threaded loop:
//! - server notifications, one JSON line per message
//! - local keystrokes, one line per guess
//!
//! Whichever arrives first is handled first. Local input is dropped unless
//! the last server message granted a turn (TURN or RECOVERY), and typing
//! `exit` during a turn leaves the game.
//!
//! ## Module Organization
//!
//! - `game`: the turn tracker deciding what local input may do
//! - `input`: stdin reader task
//! - `network`: connection handling and the run loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::input::spawn_stdin_reader;
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("127.0.0.1:8080").await?;
//!     client.run(spawn_stdin_reader(), &mut std::io::stdout()).await
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
