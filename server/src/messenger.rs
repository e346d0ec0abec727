//! Delivery of notifications to players and collection of their raw guesses
//!
//! The coordinator only talks to players through the [`Messenger`] trait.
//! [`TcpMessenger`] is the production implementation: every connection gets
//! a reader task that forwards lines into a per-player channel, so a turn
//! read is a `timeout` over one receiver and a recovery read is a single
//! `select_all` over all of them.
//!
//! Inbound lines are capped at [`MAX_LINE_BYTES`] and each channel holds at
//! most [`INBOUND_BACKLOG`] lines; once it is full the reader stops pulling
//! from the socket until the coordinator catches up.

use crate::error::ReadError;
use futures::future::select_all;
use log::{debug, error, info};
use shared::{encode_line, is_exit_command, Message};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{timeout, timeout_at, Instant};

/// Longest line accepted from a player, excluding the line terminator.
/// A guess is at most a handful of digits; anything longer ends the connection.
pub const MAX_LINE_BYTES: usize = 1024;

/// Lines buffered per player before the reader applies backpressure.
pub const INBOUND_BACKLOG: usize = 16;

#[allow(async_fn_in_trait)]
pub trait Messenger {
    /// Ids of the connected players, in turn order.
    fn player_ids(&self) -> Vec<u32>;

    /// Sends one message to one player. Delivery failures are not fatal.
    async fn send(&mut self, player: u32, message: Message);

    /// Sends a copy of `message` to every player, in turn order.
    async fn broadcast(&mut self, message: Message) {
        for player in self.player_ids() {
            self.send(player, message.clone()).await;
        }
    }

    /// Waits for the next line from `player`, bounded by `deadline` when given.
    async fn read_line(
        &mut self,
        player: u32,
        deadline: Option<Duration>,
    ) -> Result<String, ReadError>;

    /// Waits for whichever player produces a line first.
    ///
    /// There is no deadline here. Implementations that bound the wait report
    /// a lapse as `ReadError::Timeout` and the caller simply waits again.
    async fn read_any(&mut self) -> (u32, Result<String, ReadError>);

    /// Discards input from `player` that arrives within `window`. Returns the
    /// number of lines dropped.
    async fn drain(&mut self, player: u32, window: Duration) -> usize;
}

/// What a connection's reader task forwards to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inbound {
    Line(String),
    Closed(String),
}

struct Connection {
    id: u32,
    writer: OwnedWriteHalf,
    inbound: mpsc::Receiver<Inbound>,
    /// Set once the reader task has reported the connection closed.
    closed: Option<String>,
}

impl Connection {
    fn interpret(&mut self, next: Option<Inbound>) -> Result<String, ReadError> {
        if let Some(reason) = &self.closed {
            return Err(ReadError::Disconnected(reason.clone()));
        }

        match next {
            Some(Inbound::Line(line)) if is_exit_command(&line) => {
                let reason = "player left the game".to_string();
                self.closed = Some(reason.clone());
                Err(ReadError::Disconnected(reason))
            }
            Some(Inbound::Line(line)) => Ok(line),
            Some(Inbound::Closed(reason)) => {
                self.closed = Some(reason.clone());
                Err(ReadError::Disconnected(reason))
            }
            None => Err(ReadError::Disconnected("reader stopped".to_string())),
        }
    }
}

/// Messenger over accepted TCP connections, one JSON line per message
#[derive(Default)]
pub struct TcpMessenger {
    connections: Vec<Connection>,
}

impl TcpMessenger {
    /// Creates a messenger with no players attached yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of an accepted stream and starts its reader task.
    ///
    /// Attach order is turn order: `player_ids` reports players in the order
    /// they were attached. The reader task forwards every line until the
    /// socket closes, fails, or sends a line longer than [`MAX_LINE_BYTES`];
    /// the reason is then queued as the final item.
    pub fn attach(&mut self, id: u32, stream: TcpStream) {
        let (read_half, writer) = stream.into_split();
        let (tx, inbound) = mpsc::channel(INBOUND_BACKLOG);

        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                let next = read_bounded_line(&mut reader).await;
                let last = matches!(next, Inbound::Closed(_));
                if tx.send(next).await.is_err() || last {
                    break;
                }
            }
            debug!("Reader for player {} stopped", id);
        });

        info!("Player {} attached", id);
        self.connections.push(Connection {
            id,
            writer,
            inbound,
            closed: None,
        });
    }

    fn connection_mut(&mut self, player: u32) -> Result<&mut Connection, ReadError> {
        self.connections
            .iter_mut()
            .find(|connection| connection.id == player)
            .ok_or_else(|| ReadError::Disconnected(format!("unknown player {}", player)))
    }
}

/// Reads one line of at most [`MAX_LINE_BYTES`], stripping `\n` or `\r\n`.
///
/// Invalid UTF-8 is replaced rather than rejected so the guess validator can
/// report it to the player like any other bad input.
async fn read_bounded_line<R>(reader: &mut R) -> Inbound
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = MAX_LINE_BYTES as u64 + 2;

    match reader.take(limit).read_until(b'\n', &mut buf).await {
        Ok(0) => return Inbound::Closed("connection closed".to_string()),
        Ok(_) => {}
        Err(e) => return Inbound::Closed(e.to_string()),
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > MAX_LINE_BYTES {
        return Inbound::Closed(format!("line longer than {} bytes", MAX_LINE_BYTES));
    }

    Inbound::Line(String::from_utf8_lossy(&buf).into_owned())
}

impl Messenger for TcpMessenger {
    fn player_ids(&self) -> Vec<u32> {
        self.connections.iter().map(|c| c.id).collect()
    }

    async fn send(&mut self, player: u32, message: Message) {
        let line = match encode_line(&message) {
            Ok(line) => line,
            Err(e) => {
                error!("Error encoding message for player {}: {}", player, e);
                return;
            }
        };

        let Some(connection) = self.connections.iter_mut().find(|c| c.id == player) else {
            error!("No connection for player {}", player);
            return;
        };

        if let Err(e) = connection.writer.write_all(line.as_bytes()).await {
            error!("Error writing to player {}: {}", player, e);
        }
    }

    async fn read_line(
        &mut self,
        player: u32,
        deadline: Option<Duration>,
    ) -> Result<String, ReadError> {
        let connection = self.connection_mut(player)?;
        if let Some(reason) = &connection.closed {
            return Err(ReadError::Disconnected(reason.clone()));
        }

        let next = match deadline {
            Some(deadline) => timeout(deadline, connection.inbound.recv())
                .await
                .map_err(|_| ReadError::Timeout)?,
            None => connection.inbound.recv().await,
        };
        connection.interpret(next)
    }

    async fn read_any(&mut self) -> (u32, Result<String, ReadError>) {
        if let Some(connection) = self.connections.iter().find(|c| c.closed.is_some()) {
            let reason = connection.closed.clone().unwrap_or_default();
            return (connection.id, Err(ReadError::Disconnected(reason)));
        }
        if self.connections.is_empty() {
            return (0, Err(ReadError::Disconnected("no players".to_string())));
        }

        let reads = self.connections.iter_mut().map(|connection| {
            Box::pin(async move {
                let next = connection.inbound.recv().await;
                (connection.id, next)
            })
        });
        let (first, _, pending) = select_all(reads).await;
        drop(pending);
        let (player, next) = first;

        match self.connection_mut(player) {
            Ok(connection) => (player, connection.interpret(next)),
            Err(e) => (player, Err(e)),
        }
    }

    async fn drain(&mut self, player: u32, window: Duration) -> usize {
        let Ok(connection) = self.connection_mut(player) else {
            return 0;
        };
        let deadline = Instant::now() + window;
        let mut drained = 0;

        while connection.closed.is_none() {
            match timeout_at(deadline, connection.inbound.recv()).await {
                Ok(Some(Inbound::Line(line))) => {
                    debug!("Dropped late input from player {}: {:?}", player, line);
                    drained += 1;
                }
                Ok(Some(Inbound::Closed(reason))) => connection.closed = Some(reason),
                Ok(None) => connection.closed = Some("reader stopped".to_string()),
                Err(_) => break,
            }
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{decode_line, MessageKind};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Accepts `count` loopback connections and returns the messenger plus the client ends.
    async fn connected(count: u32) -> (TcpMessenger, Vec<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut messenger = TcpMessenger::new();
        let mut clients = Vec::new();

        for id in 1..=count {
            let client = TcpStream::connect(addr).await.unwrap();
            let (stream, _) = listener.accept().await.unwrap();
            messenger.attach(id, stream);
            clients.push(client);
        }
        (messenger, clients)
    }

    #[tokio::test]
    async fn test_send_writes_json_line() {
        let (mut messenger, mut clients) = connected(1).await;
        messenger
            .send(1, Message::new(MessageKind::Turn, "Your turn!\n"))
            .await;

        let mut reader = BufReader::new(&mut clients[0]);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();

        let message = decode_line(&line).unwrap();
        assert_eq!(message.kind, MessageKind::Turn);
        assert_eq!(message.text, "Your turn!\n");
    }

    #[tokio::test]
    async fn test_read_line_times_out() {
        let (mut messenger, _clients) = connected(1).await;
        let result = messenger
            .read_line(1, Some(Duration::from_millis(20)))
            .await;
        assert_eq!(result, Err(ReadError::Timeout));
    }

    #[tokio::test]
    async fn test_read_line_returns_raw_text() {
        let (mut messenger, mut clients) = connected(1).await;
        clients[0].write_all(b" 1234\r\n").await.unwrap();

        let line = messenger
            .read_line(1, Some(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(line.trim(), "1234");
    }

    #[tokio::test]
    async fn test_exit_is_a_disconnect() {
        let (mut messenger, mut clients) = connected(1).await;
        clients[0].write_all(b"exit\n").await.unwrap();

        let result = messenger.read_line(1, Some(Duration::from_secs(2))).await;
        assert!(matches!(result, Err(ReadError::Disconnected(_))));
    }

    #[tokio::test]
    async fn test_closed_connection_is_a_disconnect() {
        let (mut messenger, clients) = connected(1).await;
        drop(clients);

        let result = messenger.read_line(1, Some(Duration::from_secs(2))).await;
        assert_eq!(
            result,
            Err(ReadError::Disconnected("connection closed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_read_any_picks_first_responder() {
        let (mut messenger, mut clients) = connected(3).await;
        clients[2].write_all(b"5678\n").await.unwrap();

        let (player, line) = messenger.read_any().await;
        assert_eq!(player, 3);
        assert_eq!(line.unwrap(), "5678");
    }

    #[tokio::test]
    async fn test_drain_discards_late_input() {
        let (mut messenger, mut clients) = connected(1).await;
        clients[0].write_all(b"1111\n2222\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let drained = messenger.drain(1, Duration::from_millis(50)).await;
        assert_eq!(drained, 2);

        let after = messenger
            .read_line(1, Some(Duration::from_millis(20)))
            .await;
        assert_eq!(after, Err(ReadError::Timeout));
    }

    #[tokio::test]
    async fn test_drain_keeps_disconnect() {
        let (mut messenger, clients) = connected(1).await;
        drop(clients);
        tokio::time::sleep(Duration::from_millis(50)).await;

        messenger.drain(1, Duration::from_millis(50)).await;
        let result = messenger.read_line(1, None).await;
        assert!(matches!(result, Err(ReadError::Disconnected(_))));
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let (mut messenger, mut clients) = connected(1).await;
        let mut payload = vec![b'7'; MAX_LINE_BYTES];
        payload.extend_from_slice(b"\r\n");
        clients[0].write_all(&payload).await.unwrap();

        let line = messenger
            .read_line(1, Some(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(line.len(), MAX_LINE_BYTES);
    }

    #[tokio::test]
    async fn test_overlong_line_is_a_disconnect() {
        let (mut messenger, mut clients) = connected(1).await;
        let mut client = clients.remove(0);

        // The server stops reading once the cap is hit, so the write may never finish
        let writer = tokio::spawn(async move {
            let mut payload = vec![b'1'; 256 * 1024];
            payload.push(b'\n');
            let _ = client.write_all(&payload).await;
            client
        });

        let result = messenger.read_line(1, Some(Duration::from_secs(2))).await;
        assert_eq!(
            result,
            Err(ReadError::Disconnected(format!(
                "line longer than {} bytes",
                MAX_LINE_BYTES
            )))
        );

        // The disconnect sticks for later reads too
        let again = messenger.read_line(1, None).await;
        assert!(matches!(again, Err(ReadError::Disconnected(_))));
        writer.abort();
    }

    #[tokio::test]
    async fn test_bounded_line_reader() {
        let source: &'static [u8] = b"1234\r\n\xff12\nlast";
        let mut reader = BufReader::new(source);

        assert_eq!(
            read_bounded_line(&mut reader).await,
            Inbound::Line("1234".to_string())
        );
        assert_eq!(
            read_bounded_line(&mut reader).await,
            Inbound::Line("\u{fffd}12".to_string())
        );
        assert_eq!(
            read_bounded_line(&mut reader).await,
            Inbound::Line("last".to_string())
        );
        assert_eq!(
            read_bounded_line(&mut reader).await,
            Inbound::Closed("connection closed".to_string())
        );
    }

    #[tokio::test]
    async fn test_bounded_line_reader_rejects_unterminated_flood() {
        let flood = vec![b'9'; MAX_LINE_BYTES * 4];
        let source = tokio_test::io::Builder::new()
            .read(&flood[..MAX_LINE_BYTES])
            .read(&flood[MAX_LINE_BYTES..])
            .build();
        let mut reader = BufReader::new(source);

        assert!(matches!(
            read_bounded_line(&mut reader).await,
            Inbound::Closed(reason) if reason.contains("longer than")
        ));
    }
}
