//! Local keyboard input, read line by line on its own task

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Spawns a task forwarding stdin lines. The channel closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    spawn_line_reader(BufReader::new(tokio::io::stdin()))
}

/// Forwards every line of `source` into the returned channel.
pub fn spawn_line_reader<S>(source: S) -> mpsc::UnboundedReceiver<String>
where
    S: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = source.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("Local input closed");
    });

    rx
}
