//! Cross-session win/loss counters and the hardest-secret ranking

use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const HARDEST_LIMIT: usize = 5;

/// Append-only statistics that outlive individual game sessions
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    games_played: u32,
    wins_by_player: BTreeMap<u32, u32>,
    losses_by_player: BTreeMap<u32, u32>,
    guesses_until_win: HashMap<u32, u32>,
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished game. Every participant other than the winner takes a loss.
    pub fn record_win(&mut self, winner: u32, participants: &[u32], secret: u32, guesses: u32) {
        self.games_played += 1;
        *self.wins_by_player.entry(winner).or_insert(0) += 1;

        for player in participants.iter().filter(|id| **id != winner) {
            *self.losses_by_player.entry(*player).or_insert(0) += 1;
        }

        // A repeated secret keeps its larger count so nothing ever decreases
        let entry = self.guesses_until_win.entry(secret).or_insert(0);
        *entry = (*entry).max(guesses);
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn wins(&self, player: u32) -> u32 {
        self.wins_by_player.get(&player).copied().unwrap_or(0)
    }

    pub fn losses(&self, player: u32) -> u32 {
        self.losses_by_player.get(&player).copied().unwrap_or(0)
    }

    pub fn guesses_for(&self, secret: u32) -> Option<u32> {
        self.guesses_until_win.get(&secret).copied()
    }

    /// Top `limit` secrets by guesses until win, hardest first.
    ///
    /// Equal guess counts are ordered by secret value so the ranking is the
    /// same on every run.
    pub fn hardest(&self, limit: usize) -> Vec<(u32, u32)> {
        let mut entries: Vec<(u32, u32)> = self
            .guesses_until_win
            .iter()
            .map(|(secret, guesses)| (*secret, *guesses))
            .collect();

        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

impl fmt::Display for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "====== GAME ANALYTICS ======")?;
        writeln!(f, "Games Played: {}", self.games_played)?;
        for (player, wins) in &self.wins_by_player {
            writeln!(f, "Player {} Wins: {}", player, wins)?;
        }
        for (player, losses) in &self.losses_by_player {
            writeln!(f, "Player {} Losses: {}", player, losses)?;
        }

        let hardest = self.hardest(HARDEST_LIMIT);
        if hardest.is_empty() {
            writeln!(f, "No completed games yet to determine hardest secrets.")?;
        } else {
            writeln!(f, "Top hardest secrets (by guesses until win):")?;
            for (rank, (secret, guesses)) in hardest.iter().enumerate() {
                writeln!(
                    f,
                    "#{} Secret: {} | Guesses until win: {}",
                    rank + 1,
                    secret,
                    guesses
                )?;
            }
        }
        write!(f, "============================")
    }
}
