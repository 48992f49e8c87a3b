//! Motion sensor stack
//!
//! - `driver`: QMI8658 register access over `embedded-hal` I2C
//! - `calibration`: zero-offset computation at rest
//! - `filter`: EMA smoothing
//! - `simulated`: register-level stand-in for host runs and tests
//!
//! [`TiltSensor`] ties them together into the one object the game polls.

pub mod calibration;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod registers;
pub mod sample;
pub mod simulated;

pub use calibration::{CalibrationOffsets, CalibrationParameters, calibrate};
pub use config::{AccelRange, GyroRange, OutputDataRate, SensorConfig};
pub use driver::Qmi8658;
pub use error::ImuError;
pub use filter::{LowPassFilter, ema};
pub use sample::{ImuSample, RawSample, STANDARD_GRAVITY};

use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Anything that can be brought up and asked for raw six-axis samples.
///
/// The real part is [`Qmi8658`]; tests substitute scripted implementations.
pub trait MotionSensor {
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ImuError>;
    fn read_raw(&mut self) -> Result<RawSample, ImuError>;
    fn config(&self) -> SensorConfig;
}

impl<I: I2c> MotionSensor for Qmi8658<I> {
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ImuError> {
        Qmi8658::initialize(self, delay)
    }

    fn read_raw(&mut self) -> Result<RawSample, ImuError> {
        Qmi8658::read_raw(self)
    }

    fn config(&self) -> SensorConfig {
        *Qmi8658::config(self)
    }
}

/// Calibrated, filtered, rate-limited view of a motion sensor
pub struct TiltSensor<S> {
    device: S,
    device_found: bool,
    offsets: CalibrationOffsets,
    filter: LowPassFilter,
    /// Time of the last successful bus read
    last_read_ms: Option<u64>,
    /// Last good filtered sample
    last_sample: Option<ImuSample>,
}

impl<S: MotionSensor> TiltSensor<S> {
    pub fn new(device: S, filter_alpha: f32) -> Self {
        Self {
            device,
            device_found: false,
            offsets: CalibrationOffsets::default(),
            filter: LowPassFilter::new(filter_alpha),
            last_read_ms: None,
            last_sample: None,
        }
    }

    /// Probe and configure the device. On failure the sensor stays disabled
    /// for the rest of the session.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ImuError> {
        match self.device.initialize(delay) {
            Ok(()) => {
                self.device_found = true;
                Ok(())
            }
            Err(e) => {
                self.device_found = false;
                log::warn!("Motion sensor unavailable ({}), tilt control disabled", e);
                Err(e)
            }
        }
    }

    /// Blocking recalibration. Offsets are invalidated up front, so a failed
    /// run leaves the sensor uncalibrated.
    pub fn calibrate<D: DelayNs>(
        &mut self,
        delay: &mut D,
        params: &CalibrationParameters,
    ) -> Result<(), ImuError> {
        if !self.device_found {
            return Err(ImuError::FeatureDisabled);
        }
        self.reset_calibration();
        log::info!(
            "Calibrating IMU ({} samples, ~{} ms), hold still",
            params.samples,
            params.samples as u32 * params.delay_ms
        );
        match calibrate(&mut self.device, delay, params) {
            Ok(offsets) => {
                self.offsets = offsets;
                Ok(())
            }
            Err(e) => {
                log::warn!("Calibration failed: {}", e);
                Err(e)
            }
        }
    }

    /// Drop offsets and cached samples
    pub fn reset_calibration(&mut self) {
        self.offsets = CalibrationOffsets::default();
        self.filter.reset();
        self.last_read_ms = None;
        self.last_sample = None;
    }

    /// Current tilt sample.
    ///
    /// Reads the bus at most once per output-data-rate period; faster calls
    /// and failed reads return the last good sample. `None` until calibrated
    /// and the first read succeeds.
    pub fn poll(&mut self, now_ms: u64) -> Option<ImuSample> {
        if !self.is_calibrated() {
            return None;
        }

        let config = self.device.config();
        if let (Some(last), Some(sample)) = (self.last_read_ms, self.last_sample) {
            if now_ms.saturating_sub(last) < config.odr.period_ms() {
                return Some(sample);
            }
        }

        match self.device.read_raw() {
            Ok(raw) => {
                let corrected = self.offsets.apply(&raw);
                let sample = ImuSample::from_corrected(&corrected, &config, now_ms);
                let filtered = self.filter.apply(&sample);
                self.last_read_ms = Some(now_ms);
                self.last_sample = Some(filtered);
                Some(filtered)
            }
            Err(e) => {
                log::debug!("IMU read failed, reusing last sample: {}", e);
                self.last_sample
            }
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.device_found && self.offsets.calibrated
    }

    pub fn device_found(&self) -> bool {
        self.device_found
    }

    pub fn device(&self) -> &S {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut S {
        &mut self.device
    }
}
