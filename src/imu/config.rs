//! Full-scale ranges and output data rate
//!
//! Each setting knows its own register encoding and its conversion factor, so
//! the rest of the crate never has to touch a raw bit pattern.

use serde::{Deserialize, Serialize};

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccelRange {
    G2,
    G4,
    #[default]
    G8,
    G16,
}

impl AccelRange {
    /// `aFS` field value for `Ctrl2` bits 6:4
    pub const fn bits(self) -> u8 {
        match self {
            Self::G2 => 0b000,
            Self::G4 => 0b001,
            Self::G8 => 0b010,
            Self::G16 => 0b011,
        }
    }

    /// Raw counts for one g
    pub const fn lsb_per_g(self) -> i32 {
        match self {
            Self::G2 => 16384,
            Self::G4 => 8192,
            Self::G8 => 4096,
            Self::G16 => 2048,
        }
    }
}

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GyroRange {
    Dps128,
    Dps256,
    #[default]
    Dps512,
    Dps1024,
    Dps2048,
}

impl GyroRange {
    /// `gFS` field value for `Ctrl3` bits 6:4
    pub const fn bits(self) -> u8 {
        match self {
            Self::Dps128 => 0b011,
            Self::Dps256 => 0b100,
            Self::Dps512 => 0b101,
            Self::Dps1024 => 0b110,
            Self::Dps2048 => 0b111,
        }
    }

    /// Raw counts per degree/second
    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            Self::Dps128 => 256.0,
            Self::Dps256 => 128.0,
            Self::Dps512 => 64.0,
            Self::Dps1024 => 32.0,
            Self::Dps2048 => 16.0,
        }
    }
}

/// Output data rate shared by accelerometer and gyroscope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputDataRate {
    Hz1000,
    Hz500,
    #[default]
    Hz250,
    Hz125,
    Hz62,
}

impl OutputDataRate {
    /// ODR field value for `Ctrl2`/`Ctrl3` bits 3:0
    pub const fn bits(self) -> u8 {
        match self {
            Self::Hz1000 => 0b0011,
            Self::Hz500 => 0b0100,
            Self::Hz250 => 0b0101,
            Self::Hz125 => 0b0110,
            Self::Hz62 => 0b0111,
        }
    }

    /// Minimum spacing between two distinct samples, rounded up to whole ms
    pub const fn period_ms(self) -> u64 {
        match self {
            Self::Hz1000 => 1,
            Self::Hz500 => 2,
            Self::Hz250 => 4,
            Self::Hz125 => 8,
            Self::Hz62 => 16,
        }
    }
}

/// Complete measurement configuration written at init
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorConfig {
    pub accel_range: AccelRange,
    pub gyro_range: GyroRange,
    pub odr: OutputDataRate,
}

impl SensorConfig {
    pub const fn ctrl2(&self) -> u8 {
        (self.accel_range.bits() << 4) | self.odr.bits()
    }

    pub const fn ctrl3(&self) -> u8 {
        (self.gyro_range.bits() << 4) | self.odr.bits()
    }
}
