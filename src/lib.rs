//! Tilt Maze - motion-controlled ball maze for a handheld pet device
//!
//! Core modules:
//! - `imu`: QMI8658 driver, calibration and filtering
//! - `sim`: Deterministic simulation (physics, collisions, maze, level lifecycle)
//! - `game`: Controller tying one sensor to one game state
//! - `tuning`: Data-driven game balance
//! - `scores`: Round, run and best score bookkeeping

pub mod game;
pub mod imu;
pub mod scores;
pub mod sim;
pub mod tuning;

pub use game::{Clock, GameSnapshot, TiltMaze, update};
pub use scores::ScoreBoard;
pub use tuning::{CapPolicy, LevelParams, PhysicsTuning, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield size in game units (decoupled from screen pixels)
    pub const PLAYFIELD_WIDTH: f32 = 100.0;
    pub const PLAYFIELD_HEIGHT: f32 = 80.0;

    /// Maze grid dimensions
    pub const GRID_ROWS: usize = 8;
    pub const GRID_COLS: usize = 10;
    /// Side of one maze cell in game units
    pub const CELL_SIZE: f32 = 10.0;

    /// Ball spawn point: the playfield center, where four cells meet
    pub const SPAWN_X: f32 = PLAYFIELD_WIDTH / 2.0;
    pub const SPAWN_Y: f32 = PLAYFIELD_HEIGHT / 2.0;

    /// Nominal scheduler cadence (ms)
    pub const TICK_INTERVAL_MS: u64 = 16;
    /// How long the UI shows the end-of-level banner before advancing (ms)
    pub const END_SCREEN_MS: u64 = 2000;
}

/// Ball spawn position
#[inline]
pub fn spawn_point() -> Vec2 {
    Vec2::new(consts::SPAWN_X, consts::SPAWN_Y)
}

/// Grid cell (row, col) containing a playfield position, `None` outside the grid
#[inline]
pub fn cell_of(pos: Vec2) -> Option<(usize, usize)> {
    use consts::*;
    if !pos.is_finite() {
        return None;
    }
    let col = (pos.x / CELL_SIZE).floor();
    let row = (pos.y / CELL_SIZE).floor();
    if col < 0.0 || row < 0.0 || col >= GRID_COLS as f32 || row >= GRID_ROWS as f32 {
        return None;
    }
    Some((row as usize, col as usize))
}
