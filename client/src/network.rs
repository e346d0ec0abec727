use crate::game::{LocalAction, TurnTracker};
use log::{info, warn};
use shared::{decode_line, EXIT_COMMAND};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Connection to the game server plus the local turn view
pub struct Client {
    server_lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    tracker: TurnTracker,
}

impl Client {
    pub async fn connect(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = TcpStream::connect(server_addr).await?;
        info!("Connected to {}", server_addr);

        let (read_half, writer) = stream.into_split();
        Ok(Client {
            server_lines: BufReader::new(read_half).lines(),
            writer,
            tracker: TurnTracker::new(),
        })
    }

    pub fn tracker(&self) -> &TurnTracker {
        &self.tracker
    }

    /// Runs until the server goes away, local input ends, or the player exits.
    ///
    /// Server lines and local lines are handled in arrival order with no
    /// priority between them.
    pub async fn run<W: Write>(
        &mut self,
        mut local_input: mpsc::UnboundedReceiver<String>,
        out: &mut W,
    ) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(
            out,
            "Connected to Code Breaker server. Waiting for game updates..."
        )?;

        loop {
            tokio::select! {
                line = self.server_lines.next_line() => {
                    let Some(line) = line? else {
                        return Err("server disconnected".into());
                    };
                    match decode_line(&line) {
                        Ok(message) => {
                            if let Some(text) = self.tracker.on_server_message(&message) {
                                write!(out, "{}", text)?;
                                out.flush()?;
                            }
                        }
                        Err(e) => warn!("Ignoring server line: {}", e),
                    }
                }
                input = local_input.recv() => {
                    let Some(input) = input else {
                        info!("Local input closed");
                        return Ok(());
                    };
                    match self.tracker.on_local_input(&input) {
                        LocalAction::Send(guess) => {
                            self.writer.write_all(format!("{}\n", guess).as_bytes()).await?;
                        }
                        LocalAction::Exit => {
                            writeln!(out, "Exiting game...")?;
                            self.writer
                                .write_all(format!("{}\n", EXIT_COMMAND).as_bytes())
                                .await?;
                            return Ok(());
                        }
                        LocalAction::Ignore => {}
                    }
                }
            }
        }
    }
}
