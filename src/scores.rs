//! Score bookkeeping
//!
//! Volatile: the round award, the run total and the best run total all reset
//! on power-up.

use serde::{Deserialize, Serialize};

/// Seconds left on the clock, rounded down, zero if over time
pub fn time_bonus(time_limit_ms: u64, elapsed_ms: u64) -> u32 {
    let secs = time_limit_ms.saturating_sub(elapsed_ms) / 1000;
    u32::try_from(secs).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Award for the most recently completed level
    pub round: u32,
    /// Accumulated over the current run
    pub total: u32,
    /// Highest run total seen this session
    pub best: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a completed level. Returns the round award.
    pub fn award(&mut self, base: u32, time_limit_ms: u64, elapsed_ms: u64) -> u32 {
        let round = base.saturating_add(time_bonus(time_limit_ms, elapsed_ms));
        self.round = round;
        self.total = self.total.saturating_add(round);
        if self.total > self.best {
            self.best = self.total;
            log::info!("New best score: {}", self.best);
        }
        round
    }

    /// Clear the round award when a level starts
    pub fn start_round(&mut self) {
        self.round = 0;
    }

    /// Start a new run; the best score survives
    pub fn reset_run(&mut self) {
        self.round = 0;
        self.total = 0;
    }
}
