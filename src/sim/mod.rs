//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time and tilt come in as plain values
//! - Seeded RNG only
//! - No hardware or platform dependencies

pub mod collision;
pub mod level;
pub mod maze;
pub mod state;
pub mod tick;

pub use collision::{ClampResult, Probe, clamp_to_playfield, in_playfield, probe};
pub use level::{Difficulty, LevelError, LevelPhase, LevelState};
pub use maze::{Cell, GOAL_CELLS, MazeGrid, PLACEABLE_CELLS, SPAWN_BLOCK, generate_maze};
pub use state::{Ball, GameEvent, GameState, MAX_PENDING_EVENTS};
pub use tick::{TickInput, apply_dead_zone, tick};
