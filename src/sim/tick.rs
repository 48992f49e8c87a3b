//! Per-tick physics step
//!
//! Tilt in, ball motion out. Goal and timeout checks run after the move.

use glam::Vec2;

use super::collision::{bounce, clamp_to_playfield, in_playfield, probe};
use super::maze::Cell;
use super::state::{GameEvent, GameState};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Corrected, filtered acceleration (x, y) in m/s², gravity removed
    pub tilt: Vec2,
    /// Calibration offsets are valid; without them the tick does nothing
    pub calibrated: bool,
}

impl TickInput {
    pub fn new(tilt: Vec2) -> Self {
        Self {
            tilt,
            calibrated: true,
        }
    }
}

/// Zero each component whose magnitude is under `threshold`; non-finite
/// components are zeroed too
pub fn apply_dead_zone(tilt: Vec2, threshold: f32) -> Vec2 {
    let gate = |a: f32| {
        if a.is_finite() && a.abs() >= threshold {
            a
        } else {
            0.0
        }
    };
    Vec2::new(gate(tilt.x), gate(tilt.y))
}

/// Advance the game state by one tick at `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if !state.level.is_running() || !input.calibrated {
        return;
    }

    let physics = state.tuning.physics;
    let accel = apply_dead_zone(input.tilt, physics.dead_zone);
    let limit = Vec2::splat(physics.max_velocity.abs());

    let ball = &mut state.ball;
    ball.vel = ball.vel * physics.damping + accel / physics.gravity * physics.sensitivity;
    ball.vel = ball.vel.clamp(-limit, limit);
    if !ball.vel.is_finite() {
        ball.vel = Vec2::ZERO;
    }

    let proposed = ball.pos + ball.vel;
    let bounced = if probe(&state.maze, proposed).is_blocked() {
        ball.vel = bounce(ball.vel, physics.bounce);
        true
    } else {
        ball.pos = proposed;
        false
    };

    let clamp = clamp_to_playfield(&mut ball.pos, &mut ball.vel, physics.bounce);
    if clamp.hit() {
        log::debug!("Ball clamped to playfield at {:?}", ball.pos);
    }
    if bounced {
        state.push_event(GameEvent::WallBounce);
    }

    let cell = state.maze.cell_at(state.ball.pos);
    if matches!(cell, None | Some(Cell::Wall)) || !in_playfield(state.ball.pos) {
        log::error!(
            "Ball at {:?} is outside the open maze ({:?})",
            state.ball.pos,
            cell
        );
        debug_assert!(false, "ball left the open maze");
    }

    // Goal
    if cell == Some(Cell::Goal) && state.level.complete(now_ms) {
        let level = state.level.level;
        let award = state.scores.award(
            state.tuning.goal_award,
            state.level.time_limit_ms,
            state.level.elapsed_ms(now_ms),
        );
        let total = state.scores.total;
        log::info!("Level {} complete: +{} (total {})", level, award, total);
        state.push_event(GameEvent::LevelComplete {
            level,
            award,
            total,
        });
        return;
    }

    // Timeout
    if state.level.elapsed_ms(now_ms) > state.level.time_limit_ms && state.level.fail(now_ms) {
        log::info!("Level {} failed: out of time", state.level.level);
        state.push_event(GameEvent::LevelFailed {
            level: state.level.level,
        });
    }
}
