use clap::Parser;
use log::{error, info};
use server::config::{Difficulty, GameConfig};
use server::error::GameError;
use server::network::Server;
use std::time::Duration;

/// Command line arguments, with the environment variables the game has always read
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Number of players at the table
    #[arg(long, env = "MAX_PLAYERS", default_value = "2")]
    players: usize,

    /// Digits in the secret code (2-8)
    #[arg(short, long, env = "CODE_LENGTH", default_value = "4")]
    digits: u8,

    #[arg(long, env = "DIFFICULTY", value_enum, ignore_case = true, default_value = "medium")]
    difficulty: Difficulty,

    /// Seconds a player has to submit a guess
    #[arg(short, long, env = "TURN_TIME_SECONDS", default_value = "30")]
    turn_time: u64,

    /// Window for discarding late input after a timeout, in milliseconds
    #[arg(long, default_value = "50")]
    drain_ms: u64,

    /// Pause between a win and the next game, in milliseconds
    #[arg(long, default_value = "3000")]
    settle_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let config = GameConfig::new(
        args.digits,
        args.difficulty,
        args.players,
        Duration::from_secs(args.turn_time),
    )?
    .with_drain_window(Duration::from_millis(args.drain_ms))
    .with_settle_delay(Duration::from_millis(args.settle_ms));

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => {
            match result {
                Err(GameError::Disconnected { player, reason }) => {
                    info!("Game ended: player {} disconnected ({})", player, reason);
                }
                Err(e) => {
                    error!("Server stopped: {}", e);
                    return Err(e.into());
                }
                Ok(()) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
