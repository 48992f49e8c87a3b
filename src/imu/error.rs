use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Errors from the motion sensor and its calibration
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImuError {
    #[error("IMU not found (WHO_AM_I = 0x{found:02X}, expected 0x05)")]
    DeviceNotFound { found: u8 },

    #[error("bus transaction failed: {0:?}")]
    Bus(ErrorKind),

    #[error("configuration write to register 0x{register:02X} not acknowledged: {kind:?}")]
    ConfigWrite { register: u8, kind: ErrorKind },

    #[error("calibration collected {good} of {requested} samples")]
    CalibrationFailed { good: u16, requested: u16 },

    #[error("IMU disabled for this session")]
    FeatureDisabled,
}

impl ImuError {
    /// Build a bus error from any HAL error
    pub fn bus<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Self::Bus(err.kind())
    }
}
