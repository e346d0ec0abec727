//! Client-side view of whose turn it is

use shared::{is_exit_command, Message, MessageKind};

/// What to do with a line the local player typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    /// Forward the guess to the server.
    Send(String),
    /// Close the connection and stop.
    Exit,
    /// Not our turn; drop it.
    Ignore,
}

/// Tracks whether local input is currently allowed
///
/// The server decides turns; the client only mirrors the last TURN/RECOVERY
/// grant so keystrokes typed out of turn never reach the wire.
#[derive(Debug, Default)]
pub struct TurnTracker {
    my_turn: bool,
    last_shown: Option<Message>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    /// Applies a server message. Returns the text to show, or `None` when it
    /// repeats the previous message exactly.
    pub fn on_server_message(&mut self, message: &Message) -> Option<String> {
        self.my_turn = message.kind.grants_input();

        if self.last_shown.as_ref() == Some(message) {
            return None;
        }
        self.last_shown = Some(message.clone());

        let mut text = message.text.clone();
        match message.kind {
            MessageKind::Turn => text.push_str("Your guess: "),
            MessageKind::Recovery => text.push_str("Recovery guess allowed: "),
            _ => {}
        }
        Some(text)
    }

    /// Decides what to do with one line of local input.
    pub fn on_local_input(&mut self, line: &str) -> LocalAction {
        if !self.my_turn {
            return LocalAction::Ignore;
        }
        self.my_turn = false;

        if is_exit_command(line) {
            LocalAction::Exit
        } else {
            LocalAction::Send(shared::clean_input(line).to_string())
        }
    }
}
