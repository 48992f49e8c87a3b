//! Raw and converted IMU samples

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::SensorConfig;
use super::registers::SAMPLE_BLOCK_LEN;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// One accel + gyro reading in device counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
}

impl RawSample {
    pub fn new(accel: [i16; 3], gyro: [i16; 3]) -> Self {
        Self { accel, gyro }
    }

    /// Decode the 12-byte burst starting at `AX_L` (little-endian axes)
    pub fn from_le_bytes(buf: &[u8; SAMPLE_BLOCK_LEN]) -> Self {
        let axis = |i: usize| i16::from_le_bytes([buf[2 * i], buf[2 * i + 1]]);
        Self {
            accel: [axis(0), axis(1), axis(2)],
            gyro: [axis(3), axis(4), axis(5)],
        }
    }

    /// Encode in device byte order (used by the simulated part)
    pub fn to_le_bytes(&self) -> [u8; SAMPLE_BLOCK_LEN] {
        let mut buf = [0u8; SAMPLE_BLOCK_LEN];
        for (i, v) in self.accel.iter().chain(self.gyro.iter()).enumerate() {
            buf[2 * i..2 * i + 2].copy_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

/// Offset-corrected counts, gravity already removed from Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorrectedSample {
    pub accel: [i32; 3],
    pub gyro: [i32; 3],
}

/// Calibrated sample in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuSample {
    /// Linear acceleration (m/s²)
    pub accel: Vec3,
    /// Angular rate (°/s)
    pub gyro: Vec3,
    /// Acquisition time (ms)
    pub timestamp_ms: u64,
}

impl ImuSample {
    pub fn from_corrected(
        corrected: &CorrectedSample,
        config: &SensorConfig,
        timestamp_ms: u64,
    ) -> Self {
        let accel_scale = STANDARD_GRAVITY / config.accel_range.lsb_per_g() as f32;
        let gyro_scale = 1.0 / config.gyro_range.lsb_per_dps();
        let [ax, ay, az] = corrected.accel.map(|v| v as f32 * accel_scale);
        let [gx, gy, gz] = corrected.gyro.map(|v| v as f32 * gyro_scale);
        Self {
            accel: Vec3::new(ax, ay, az),
            gyro: Vec3::new(gx, gy, gz),
            timestamp_ms,
        }
    }
}
