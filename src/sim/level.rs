//! Level lifecycle: Idle → Running → Complete | Failed

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::{CapPolicy, LevelParams};

/// Lifecycle phase of the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPhase {
    /// No level started yet
    #[default]
    Idle,
    /// Ticks move the ball
    Running,
    /// Goal reached; waits for advance/retry
    Complete,
    /// Time ran out; waits for advance/retry
    Failed,
}

impl LevelPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LevelPhase::Complete | LevelPhase::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelPhase::Idle => "idle",
            LevelPhase::Running => "running",
            LevelPhase::Complete => "complete",
            LevelPhase::Failed => "failed",
        }
    }
}

/// Difficulty tier shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=2 => Difficulty::Easy,
            3..=4 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    #[error("level is {}, not finished", .0.as_str())]
    NotFinished(LevelPhase),
}

/// Current level and its clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level index
    pub level: u32,
    pub difficulty: Difficulty,
    pub time_limit_ms: u64,
    pub start_ms: u64,
    /// Set when the level completes or fails; freezes elapsed time
    pub finished_ms: Option<u64>,
    pub phase: LevelPhase,
}

impl Default for LevelState {
    fn default() -> Self {
        Self {
            level: 1,
            difficulty: Difficulty::Easy,
            time_limit_ms: 0,
            start_ms: 0,
            finished_ms: None,
            phase: LevelPhase::Idle,
        }
    }
}

impl LevelState {
    /// Enter Running for `level` at `now_ms`
    pub fn begin(&mut self, level: u32, params: LevelParams, now_ms: u64) {
        self.level = level;
        self.difficulty = Difficulty::for_level(level);
        self.time_limit_ms = params.time_limit_ms;
        self.start_ms = now_ms;
        self.finished_ms = None;
        self.phase = LevelPhase::Running;
    }

    /// Milliseconds since start; frozen once the level is over
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.phase {
            LevelPhase::Idle => 0,
            _ => self
                .finished_ms
                .unwrap_or(now_ms)
                .saturating_sub(self.start_ms),
        }
    }

    /// Milliseconds left on the clock, zero outside Running
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.phase {
            LevelPhase::Running => self.time_limit_ms.saturating_sub(self.elapsed_ms(now_ms)),
            _ => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == LevelPhase::Running
    }

    pub fn is_complete(&self) -> bool {
        self.phase == LevelPhase::Complete
    }

    pub fn is_failed(&self) -> bool {
        self.phase == LevelPhase::Failed
    }

    /// Running → Complete. Returns false if the level was not running.
    pub(crate) fn complete(&mut self, now_ms: u64) -> bool {
        self.finish(LevelPhase::Complete, now_ms)
    }

    /// Running → Failed. Returns false if the level was not running.
    pub(crate) fn fail(&mut self, now_ms: u64) -> bool {
        self.finish(LevelPhase::Failed, now_ms)
    }

    fn finish(&mut self, phase: LevelPhase, now_ms: u64) -> bool {
        if self.phase != LevelPhase::Running {
            return false;
        }
        self.phase = phase;
        self.finished_ms = Some(now_ms);
        true
    }

    /// Level that `advance` moves to
    pub fn next_level(&self, max_level: u32, policy: CapPolicy) -> Result<u32, LevelError> {
        self.ensure_finished()?;
        if self.level < max_level {
            return Ok(self.level + 1);
        }
        Ok(match policy {
            CapPolicy::Wrap => 1,
            CapPolicy::Stop => max_level,
        })
    }

    /// Level that `retry` restarts
    pub fn retry_level(&self) -> Result<u32, LevelError> {
        self.ensure_finished()?;
        Ok(self.level)
    }

    /// Next on completion, same level on failure
    pub fn advance_or_retry_level(
        &self,
        max_level: u32,
        policy: CapPolicy,
    ) -> Result<u32, LevelError> {
        match self.phase {
            LevelPhase::Complete => self.next_level(max_level, policy),
            _ => self.retry_level(),
        }
    }

    fn ensure_finished(&self) -> Result<(), LevelError> {
        if self.phase.is_terminal() {
            Ok(())
        } else {
            Err(LevelError::NotFinished(self.phase))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(time_limit_ms: u64) -> LevelParams {
        LevelParams {
            wall_count: 8,
            time_limit_ms,
        }
    }

    #[test]
    fn test_difficulty_tiers() {
        assert_eq!(Difficulty::for_level(1), Difficulty::Easy);
        assert_eq!(Difficulty::for_level(2), Difficulty::Easy);
        assert_eq!(Difficulty::for_level(3), Difficulty::Medium);
        assert_eq!(Difficulty::for_level(4), Difficulty::Medium);
        assert_eq!(Difficulty::for_level(5), Difficulty::Hard);
        assert_eq!(Difficulty::for_level(40), Difficulty::Hard);
    }

    #[test]
    fn test_clock() {
        let mut level = LevelState::default();
        assert_eq!(level.remaining_ms(500), 0);

        level.begin(1, params(30_000), 1_000);
        assert_eq!(level.elapsed_ms(6_000), 5_000);
        assert_eq!(level.remaining_ms(6_000), 25_000);
        assert_eq!(level.remaining_ms(40_000), 0);
        // Clock before start never underflows
        assert_eq!(level.elapsed_ms(0), 0);

        assert!(level.complete(7_000));
        assert_eq!(level.elapsed_ms(99_000), 6_000);
        assert_eq!(level.remaining_ms(99_000), 0);
    }

    #[test]
    fn test_finish_only_from_running() {
        let mut level = LevelState::default();
        assert!(!level.complete(0));
        level.begin(2, params(1_000), 0);
        assert!(level.fail(1_001));
        assert!(!level.complete(1_002));
        assert!(!level.fail(1_003));
        assert_eq!(level.phase, LevelPhase::Failed);
        assert_eq!(level.finished_ms, Some(1_001));
    }

    #[test]
    fn test_advance_requires_terminal_phase() {
        let mut level = LevelState::default();
        assert_eq!(
            level.next_level(6, CapPolicy::Wrap),
            Err(LevelError::NotFinished(LevelPhase::Idle))
        );
        level.begin(1, params(1_000), 0);
        assert_eq!(
            level.retry_level(),
            Err(LevelError::NotFinished(LevelPhase::Running))
        );
        level.complete(10);
        assert_eq!(level.next_level(6, CapPolicy::Wrap), Ok(2));
        assert_eq!(level.retry_level(), Ok(1));
    }

    #[test]
    fn test_cap_policy() {
        let mut level = LevelState::default();
        level.begin(6, params(1_000), 0);
        level.complete(10);
        assert_eq!(level.next_level(6, CapPolicy::Wrap), Ok(1));
        assert_eq!(level.next_level(6, CapPolicy::Stop), Ok(6));
    }

    #[test]
    fn test_advance_or_retry() {
        let mut level = LevelState::default();
        level.begin(3, params(1_000), 0);
        level.fail(1_001);
        assert_eq!(level.advance_or_retry_level(6, CapPolicy::Wrap), Ok(3));

        level.begin(3, params(1_000), 2_000);
        level.complete(2_500);
        assert_eq!(level.advance_or_retry_level(6, CapPolicy::Wrap), Ok(4));
    }

    #[test]
    fn test_error_message() {
        let err = LevelError::NotFinished(LevelPhase::Running);
        assert_eq!(err.to_string(), "level is running, not finished");
    }
}
