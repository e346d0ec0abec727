//! Player registration for the connection-acceptance phase
//!
//! The lobby hands out stable player ids while the table fills up:
//! - ids start at 1 and increase with every join, never reused
//! - capacity is the configured player count
//!
//! Once full, the coordinator refers to players by these ids only. Turn
//! order is join order, which the messenger preserves by attach order.

use log::info;
use std::net::SocketAddr;

#[derive(Debug)]
pub struct Lobby {
    seated: usize,
    next_player_id: u32,
    capacity: usize,
}

impl Lobby {
    /// Creates an empty lobby for a table of `capacity` players.
    pub fn new(capacity: usize) -> Self {
        Self {
            seated: 0,
            next_player_id: 1,
            capacity,
        }
    }

    /// Seats a new player and returns the id to announce in the welcome.
    ///
    /// Callers stop accepting connections once [`Lobby::is_full`] reports true.
    pub fn join(&mut self, addr: SocketAddr) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.seated += 1;

        info!("Player {} connected from {}", id, addr);
        id
    }

    /// True once every seat is taken and the game can start.
    pub fn is_full(&self) -> bool {
        self.seated >= self.capacity
    }

    /// Seats still open, used for the "waiting for N players" log line.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.seated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn test_lobby_creation() {
        let lobby = Lobby::new(3);
        assert!(!lobby.is_full());
        assert_eq!(lobby.remaining(), 3);
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut lobby = Lobby::new(3);

        assert_eq!(lobby.join(addr(9001)), 1);
        assert_eq!(lobby.remaining(), 2);
        assert_eq!(lobby.join(addr(9002)), 2);
        assert_eq!(lobby.join(addr(9003)), 3);
        assert!(lobby.is_full());
        assert_eq!(lobby.remaining(), 0);
    }

    #[test]
    fn test_single_seat_fills_immediately() {
        let mut lobby = Lobby::new(1);
        lobby.join(addr(9001));
        assert!(lobby.is_full());
    }

    #[test]
    fn test_ids_are_not_reused_by_address() {
        let mut lobby = Lobby::new(2);
        let first = lobby.join(addr(9001));
        let second = lobby.join(addr(9001));
        assert_ne!(first, second);
    }
}
