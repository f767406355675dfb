//! Session counters and the persisted win tally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::board::Mark;

/// Wins and draws since the current match started. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl SessionCounters {
    pub fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::X => self.x_wins += 1,
            Mark::O => self.o_wins += 1,
        }
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }

    pub fn wins(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x_wins,
            Mark::O => self.o_wins,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub wins: u32,
}

/// Per-player win counts keyed by display name.
///
/// `high_score` always equals the largest `wins` value, or 0 when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStore {
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub players: BTreeMap<String, PlayerRecord>,
}

impl ScoreStore {
    /// Credit one win to `name`. Returns the player's new total.
    pub fn record_win(&mut self, name: &str) -> u32 {
        let record = self.players.entry(name.to_string()).or_default();
        record.wins += 1;
        let wins = record.wins;
        self.recompute_high_score();
        wins
    }

    pub fn wins(&self, name: &str) -> u32 {
        self.players.get(name).map(|p| p.wins).unwrap_or(0)
    }

    /// Restore the high-score invariant, e.g. after loading a hand-edited
    /// document.
    pub fn recompute_high_score(&mut self) {
        self.high_score = self.players.values().map(|p| p.wins).max().unwrap_or(0);
    }

    /// Players ordered by wins, most first; ties by name.
    pub fn leaderboard(&self) -> Vec<(&str, u32)> {
        let mut rows: Vec<(&str, u32)> = self
            .players
            .iter()
            .map(|(name, record)| (name.as_str(), record.wins))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_tracks_max() {
        let mut store = ScoreStore::default();
        assert_eq!(store.high_score, 0);
        store.record_win("Ada");
        store.record_win("Computer");
        store.record_win("Computer");
        assert_eq!(store.high_score, 2);
        assert_eq!(store.wins("Ada"), 1);
        assert_eq!(store.wins("Nobody"), 0);
    }

    #[test]
    fn loaded_store_is_normalized() {
        let mut store: ScoreStore =
            serde_json::from_str(r#"{"highScore":9,"players":{"Ada":{"wins":3}}}"#).unwrap();
        store.recompute_high_score();
        assert_eq!(store.high_score, 3);
    }

    #[test]
    fn serializes_camel_case() {
        let mut store = ScoreStore::default();
        store.record_win("Ada");
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"highScore":1,"players":{"Ada":{"wins":1}}}"#);
    }

    #[test]
    fn leaderboard_order() {
        let mut store = ScoreStore::default();
        store.record_win("Bo");
        store.record_win("Ada");
        store.record_win("Cy");
        store.record_win("Cy");
        assert_eq!(store.leaderboard(), vec![("Cy", 2), ("Ada", 1), ("Bo", 1)]);
    }

    #[test]
    fn session_counters() {
        let mut session = SessionCounters::default();
        session.record_win(Mark::O);
        session.record_draw();
        session.record_draw();
        assert_eq!(session.wins(Mark::O), 1);
        assert_eq!(session.wins(Mark::X), 0);
        assert_eq!(session.draws, 2);
    }
}
