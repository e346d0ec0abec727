//! Server network layer: accepts the table's players over TCP and runs the coordinator

use crate::config::GameConfig;
use crate::coordinator::Coordinator;
use crate::error::GameError;
use crate::lobby::Lobby;
use crate::messenger::{Messenger, TcpMessenger};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Message, MessageKind};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Listener plus the configuration for the table it serves
pub struct Server {
    listener: TcpListener,
    config: GameConfig,
}

impl Server {
    /// Binds the listener. Port 0 picks an ephemeral port; see [`Server::local_addr`].
    pub async fn bind(addr: &str, config: GameConfig) -> Result<Self, GameError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server { listener, config })
    }

    /// The address players should connect to.
    pub fn local_addr(&self) -> Result<SocketAddr, GameError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Accepts connections until every seat is taken, welcoming each player.
    pub async fn accept_players(&self) -> Result<TcpMessenger, GameError> {
        let mut lobby = Lobby::new(self.config.player_count());
        let mut messenger = TcpMessenger::new();

        info!(
            "Settings: code length={} | difficulty={} | turn time={}s",
            self.config.digit_width(),
            self.config.difficulty(),
            self.config.turn_timeout().as_secs()
        );
        info!("Waiting for {} players...", lobby.remaining());

        while !lobby.is_full() {
            let (stream, addr) = self.listener.accept().await?;

            let id = lobby.join(addr);
            messenger.attach(id, stream);
            messenger
                .send(
                    id,
                    Message::new(
                        MessageKind::Info,
                        format!("Welcome Player {}! Waiting for others...\n", id),
                    ),
                )
                .await;
        }

        Ok(messenger)
    }

    /// Fills the table, then plays until a player disconnects.
    pub async fn run(self) -> Result<(), GameError> {
        let messenger = self.accept_players().await?;
        let mut coordinator = Coordinator::new(self.config, messenger, StdRng::from_entropy())?;
        coordinator.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use shared::decode_line;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpStream;

    fn config(players: usize) -> GameConfig {
        GameConfig::new(4, Difficulty::Easy, players, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0", config(2)).await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.config().player_count(), 2);
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_address() {
        let result = Server::bind("not-an-address", config(2)).await;
        assert!(matches!(result, Err(GameError::Io(_))));
    }

    #[tokio::test]
    async fn test_accept_players_welcomes_in_join_order() {
        let server = Server::bind("127.0.0.1:0", config(2)).await.unwrap();
        let addr = server.local_addr().unwrap();

        let clients = async {
            let first = TcpStream::connect(addr).await.unwrap();
            let mut first = BufReader::new(first);
            let mut line = String::new();
            first.read_line(&mut line).await.unwrap();
            let welcome_one = decode_line(&line).unwrap();

            let second = TcpStream::connect(addr).await.unwrap();
            let mut second = BufReader::new(second);
            line.clear();
            second.read_line(&mut line).await.unwrap();
            let welcome_two = decode_line(&line).unwrap();

            (first, second, welcome_one, welcome_two)
        };

        let (messenger, (_first, _second, welcome_one, welcome_two)) =
            tokio::join!(server.accept_players(), clients);
        let messenger = messenger.unwrap();

        assert_eq!(messenger.player_ids(), vec![1, 2]);
        assert_eq!(welcome_one.kind, MessageKind::Info);
        assert!(welcome_one.text.starts_with("Welcome Player 1!"));
        assert!(welcome_two.text.starts_with("Welcome Player 2!"));
    }
}
