//! Where finished runs go
//!
//! The simulation hands each finished run's frozen survival time to exactly one
//! `ScoreSink`. A real deployment forwards it to the prize ledger; the
//! in-memory `SurvivalBoard` keeps the top 10 for local play and tests.

use serde::{Deserialize, Serialize};

use crate::sim::GameOverCause;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A finished run, as reported to the score sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub player_name: String,
    /// Whole seconds survived - the submitted score
    pub survival_secs: u32,
    /// Player length at death (informational)
    pub length: usize,
    pub cause: GameOverCause,
    /// Host timestamp (ms) when the run ended
    pub ended_at_ms: f64,
}

/// Consumer of game-over notifications
pub trait ScoreSink {
    fn submit_survival(&mut self, result: &RunResult);
}

impl<F: FnMut(&RunResult)> ScoreSink for F {
    fn submit_survival(&mut self, result: &RunResult) {
        self(result)
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub name: String,
    pub survival_secs: u32,
    /// Host timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Longest survival times, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurvivalBoard {
    pub entries: Vec<BoardEntry>,
}

impl SurvivalBoard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a survival time would make the board
    pub fn qualifies(&self, survival_secs: u32) -> bool {
        if survival_secs == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries
            .last()
            .map(|e| survival_secs > e.survival_secs)
            .unwrap_or(true)
    }

    /// Rank a survival time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, survival_secs: u32) -> Option<usize> {
        if !self.qualifies(survival_secs) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| survival_secs > e.survival_secs);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies; returns the rank achieved
    pub fn record(&mut self, name: &str, survival_secs: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(survival_secs)?;
        self.entries.insert(
            rank - 1,
            BoardEntry {
                name: name.to_string(),
                survival_secs,
                timestamp,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest survival so far
    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.survival_secs)
    }
}

impl ScoreSink for SurvivalBoard {
    fn submit_survival(&mut self, result: &RunResult) {
        match self.record(&result.player_name, result.survival_secs, result.ended_at_ms) {
            Some(rank) => log::info!(
                "{} survived {}s - rank #{}",
                result.player_name,
                result.survival_secs,
                rank
            ),
            None => log::debug!(
                "{} survived {}s - not a top {} time",
                result.player_name,
                result.survival_secs,
                MAX_ENTRIES
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_never_qualifies() {
        let board = SurvivalBoard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.potential_rank(0), None);
    }

    #[test]
    fn keeps_best_first_and_trims() {
        let mut board = SurvivalBoard::new();
        for secs in 1..=12u32 {
            board.record("p", secs, secs as f64);
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.best(), Some(12));
        assert_eq!(board.entries.last().map(|e| e.survival_secs), Some(3));
        assert!(!board.qualifies(3));
        assert_eq!(board.potential_rank(7), Some(7));
    }

    #[test]
    fn ties_rank_after_existing() {
        let mut board = SurvivalBoard::new();
        board.record("first", 30, 1.0);
        assert_eq!(board.record("second", 30, 2.0), Some(2));
        assert_eq!(board.entries[0].name, "first");
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: &RunResult| seen.push(r.survival_secs);
            sink.submit_survival(&RunResult {
                player_name: "p".into(),
                survival_secs: 9,
                length: 12,
                cause: GameOverCause::OutOfBounds,
                ended_at_ms: 0.0,
            });
        }
        assert_eq!(seen, vec![9]);
    }
}
