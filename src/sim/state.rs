//! Game state and core simulation types
//!
//! Everything the tick reads or writes lives here. Hardware stays outside:
//! the state takes tilt and time as plain inputs.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{Difficulty, LevelError, LevelState};
use super::maze::{MazeGrid, generate_maze};
use crate::scores::ScoreBoard;
use crate::spawn_point;
use crate::tuning::Tuning;

/// The ball: a point with a velocity, in playfield units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self::at_spawn()
    }
}

impl Ball {
    /// At rest on the spawn point
    pub fn at_spawn() -> Self {
        Self {
            pos: spawn_point(),
            vel: Vec2::ZERO,
        }
    }
}

/// Events emitted by the simulation (drained by the host for sound/UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, difficulty: Difficulty },
    /// A move was rejected by a wall or the grid edge
    WallBounce,
    LevelComplete { level: u32, award: u32, total: u32 },
    LevelFailed { level: u32 },
}

/// Undrained events kept at most; the oldest are dropped first
pub const MAX_PENDING_EVENTS: usize = 64;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub ball: Ball,
    pub maze: MazeGrid,
    pub level: LevelState,
    pub scores: ScoreBoard,
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// Create an idle game state with the given seed. An invalid tuning is
    /// replaced by the defaults.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            ball: Ball::at_spawn(),
            maze: MazeGrid::open(),
            level: LevelState::default(),
            scores: ScoreBoard::new(),
            events: VecDeque::new(),
        }
    }

    /// Start (or restart) a level: ball to spawn, fresh maze, clock from
    /// `now_ms`. Callable from any phase; `level` is clamped to the table.
    pub fn start_level(&mut self, level: u32, now_ms: u64) {
        let level = level.clamp(1, self.tuning.max_level());
        let params = self.tuning.level(level);

        self.ball = Ball::at_spawn();
        self.maze = generate_maze(level, &self.tuning, &mut self.rng);
        self.level.begin(level, params, now_ms);
        self.scores.start_round();

        log::info!(
            "Level {} ({}) started, {} ms on the clock",
            level,
            self.level.difficulty.as_str(),
            params.time_limit_ms
        );
        self.push_event(GameEvent::LevelStarted {
            level,
            difficulty: self.level.difficulty,
        });
    }

    /// Level an advance would start
    pub fn next_level(&self) -> Result<u32, LevelError> {
        self.level
            .next_level(self.tuning.max_level(), self.tuning.cap_policy)
    }

    /// Level an advance-or-retry would start
    pub fn advance_or_retry_level(&self) -> Result<u32, LevelError> {
        self.level
            .advance_or_retry_level(self.tuning.max_level(), self.tuning.cap_policy)
    }

    /// Queue an event. Repeated bounces collapse into one, and a full queue
    /// drops its oldest entry.
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if event == GameEvent::WallBounce && self.events.back() == Some(&GameEvent::WallBounce) {
            return;
        }
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}
