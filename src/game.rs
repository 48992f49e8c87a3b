//! Game controller
//!
//! [`TiltMaze`] owns one sensor and one game state. The host calls
//! [`TiltMaze::update`] on a fixed cadence and reads the getters (or a
//! [`GameSnapshot`]) to draw; start/reset/advance are the only triggers.

use embedded_hal::delay::DelayNs;
use glam::Vec2;
use serde::Serialize;

use crate::imu::{MotionSensor, TiltSensor};
use crate::sim::{
    Difficulty, GameEvent, GameState, LevelError, LevelPhase, MazeGrid, TickInput, tick,
};
use crate::tuning::Tuning;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// One game tick: poll the sensor and step the physics.
///
/// Does nothing outside Running. When the sensor is uncalibrated the tick is
/// inert, including the timeout check.
pub fn update<S: MotionSensor>(sensor: &mut TiltSensor<S>, state: &mut GameState, now_ms: u64) {
    if !state.level.is_running() {
        return;
    }
    let sample = sensor.poll(now_ms);
    let input = TickInput {
        tilt: sample.map(|s| s.accel.truncate()).unwrap_or(Vec2::ZERO),
        calibrated: sensor.is_calibrated(),
    };
    tick(state, &input, now_ms);
}

/// Read-only view for rendering and UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub ball: Vec2,
    pub maze: MazeGrid,
    pub level: u32,
    pub difficulty: Difficulty,
    pub phase: LevelPhase,
    pub round_score: u32,
    pub score: u32,
    pub best_score: u32,
    pub remaining_ms: u64,
    pub calibrated: bool,
    pub device_found: bool,
}

/// Tilt maze: sensor + delay + clock + game state
pub struct TiltMaze<S, D, C> {
    sensor: TiltSensor<S>,
    delay: D,
    clock: C,
    state: GameState,
}

impl<S, D, C> TiltMaze<S, D, C>
where
    S: MotionSensor,
    D: DelayNs,
    C: Clock,
{
    pub fn new(device: S, delay: D, clock: C, tuning: Tuning, seed: u64) -> Self {
        let sensor = TiltSensor::new(device, tuning.filter_alpha);
        Self {
            sensor,
            delay,
            clock,
            state: GameState::new(seed, tuning),
        }
    }

    /// Bring up the sensor and start level 1. Returns whether the sensor was
    /// found; without it the game shows but the ball never moves.
    pub fn boot(&mut self) -> bool {
        let found = self.sensor.initialize(&mut self.delay).is_ok();
        self.start_level(1);
        found
    }

    /// Start `level` (clamped to the table) with a fresh calibration. The
    /// level clock starts after calibration finishes.
    pub fn start_level(&mut self, level: u32) {
        if self.sensor.device_found() {
            let params = self.state.tuning.calibration;
            if self.sensor.calibrate(&mut self.delay, &params).is_err() {
                log::warn!("Starting level {} without calibration, tilt disabled", level);
            }
        }
        let now = self.clock.now_ms();
        self.state.start_level(level, now);
    }

    /// Back to level 1 with a fresh run total
    pub fn reset(&mut self) {
        self.state.scores.reset_run();
        self.start_level(1);
    }

    /// From a finished level to the next one
    pub fn advance(&mut self) -> Result<u32, LevelError> {
        let level = self.state.next_level()?;
        self.start_level(level);
        Ok(level)
    }

    /// From a finished level to the same one again
    pub fn retry(&mut self) -> Result<u32, LevelError> {
        let level = self.state.level.retry_level()?;
        self.start_level(level);
        Ok(level)
    }

    /// Next level after a win, same level after a loss
    pub fn advance_or_retry(&mut self) -> Result<u32, LevelError> {
        let level = self.state.advance_or_retry_level()?;
        self.start_level(level);
        Ok(level)
    }

    /// Per-tick entry point
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        update(&mut self.sensor, &mut self.state, now);
    }

    pub fn ball_position(&self) -> Vec2 {
        self.state.ball.pos
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.state.maze
    }

    pub fn level(&self) -> u32 {
        self.state.level.level
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.level.difficulty
    }

    pub fn phase(&self) -> LevelPhase {
        self.state.level.phase
    }

    pub fn round_score(&self) -> u32 {
        self.state.scores.round
    }

    pub fn score(&self) -> u32 {
        self.state.scores.total
    }

    pub fn best_score(&self) -> u32 {
        self.state.scores.best
    }

    pub fn is_level_complete(&self) -> bool {
        self.state.level.is_complete()
    }

    pub fn is_level_failed(&self) -> bool {
        self.state.level.is_failed()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state.level.remaining_ms(self.clock.now_ms())
    }

    pub fn is_calibrated(&self) -> bool {
        self.sensor.is_calibrated()
    }

    pub fn device_found(&self) -> bool {
        self.sensor.device_found()
    }

    /// Take pending simulation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            ball: self.ball_position(),
            maze: self.state.maze.clone(),
            level: self.level(),
            difficulty: self.difficulty(),
            phase: self.phase(),
            round_score: self.round_score(),
            score: self.score(),
            best_score: self.best_score(),
            remaining_ms: self.remaining_ms(),
            calibrated: self.is_calibrated(),
            device_found: self.device_found(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sensor(&self) -> &TiltSensor<S> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut TiltSensor<S> {
        &mut self.sensor
    }
}
