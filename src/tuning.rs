//! Data-driven game balance
//!
//! Physics constants and the per-level table live here so they can be
//! tweaked from a JSON file without touching the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::imu::{CalibrationParameters, STANDARD_GRAVITY};
use crate::sim::maze::PLACEABLE_CELLS;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("level table is empty")]
    NoLevels,
    #[error("wall count decreases at level {level}")]
    DecreasingWalls { level: u32 },
    #[error("level {level} asks for {walls} walls, more than the maze has room for")]
    TooManyWalls { level: u32, walls: u8 },
    #[error("filter alpha {0} outside [0, 1]")]
    FilterAlpha(f32),
    #[error("damping {0} must be in [0, 1)")]
    Damping(f32),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What `advance` does past the last level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapPolicy {
    /// Back to level 1
    #[default]
    Wrap,
    /// Replay the last level
    Stop,
}

/// Parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Walls placed by the generator
    pub wall_count: u8,
    /// Time to reach the goal (ms)
    pub time_limit_ms: u64,
}

/// Ball physics constants (playfield units per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Tilt below this (m/s²) is treated as noise
    pub dead_zone: f32,
    /// Velocity gained per tick at one g of tilt
    pub sensitivity: f32,
    /// Per-tick velocity retention
    pub damping: f32,
    /// Per-axis speed cap
    pub max_velocity: f32,
    /// Velocity multiplier on a rejected move
    pub bounce: f32,
    /// Acceleration that counts as one g (m/s²)
    pub gravity: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            dead_zone: 0.3,
            sensitivity: 0.6,
            damping: 0.92,
            max_velocity: 3.0,
            bounce: -0.6,
            gravity: STANDARD_GRAVITY,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    /// EMA responsiveness; near 1.0 for low latency
    pub filter_alpha: f32,
    pub calibration: CalibrationParameters,
    /// Fixed award for reaching the goal, before the time bonus
    pub goal_award: u32,
    pub cap_policy: CapPolicy,
    /// Level table, index 0 is level 1. Wall counts must not decrease.
    pub levels: Vec<LevelParams>,
}

impl Default for Tuning {
    fn default() -> Self {
        let level = |wall_count, secs: u64| LevelParams {
            wall_count,
            time_limit_ms: secs * 1000,
        };
        Self {
            physics: PhysicsTuning::default(),
            filter_alpha: 0.9,
            calibration: CalibrationParameters::default(),
            goal_award: 100,
            cap_policy: CapPolicy::Wrap,
            levels: vec![
                level(8, 30),
                level(10, 30),
                level(14, 25),
                level(16, 25),
                level(20, 20),
                level(24, 20),
            ],
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.levels.is_empty() {
            return Err(TuningError::NoLevels);
        }
        let mut prev_walls = 0;
        for (i, params) in self.levels.iter().enumerate() {
            let level = i as u32 + 1;
            if params.wall_count < prev_walls {
                return Err(TuningError::DecreasingWalls { level });
            }
            if params.wall_count as usize > PLACEABLE_CELLS {
                return Err(TuningError::TooManyWalls {
                    level,
                    walls: params.wall_count,
                });
            }
            prev_walls = params.wall_count;
        }
        if !(0.0..=1.0).contains(&self.filter_alpha) {
            return Err(TuningError::FilterAlpha(self.filter_alpha));
        }
        if !(0.0..1.0).contains(&self.physics.damping) {
            return Err(TuningError::Damping(self.physics.damping));
        }
        Ok(())
    }

    /// Highest level index
    pub fn max_level(&self) -> u32 {
        self.levels.len().max(1) as u32
    }

    /// Parameters for a 1-based level, clamped into the table
    pub fn level(&self, level: u32) -> LevelParams {
        let index = (level.clamp(1, self.max_level()) - 1) as usize;
        self.levels.get(index).copied().unwrap_or(LevelParams {
            wall_count: 0,
            time_limit_ms: 30_000,
        })
    }

    /// Load from a JSON file, falling back to defaults on any problem
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
