//! Static zero-offset calibration
//!
//! The device must be held still and level for the whole run. Offsets are the
//! per-axis means of the collected samples, with the one-gravity reading taken
//! out of Z, so that a resting device reads zero on all six channels once the
//! offsets (and the gravity reference) are subtracted.
//!
//! This is a blocking call: `samples × delay_ms` (about one second with the
//! defaults) during which the caller does nothing else.

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use super::MotionSensor;
use super::error::ImuError;
use super::sample::{CorrectedSample, RawSample};

/// Calibration run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationParameters {
    /// Samples to request
    pub samples: u16,
    /// Pause between reads (ms)
    pub delay_ms: u32,
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self {
            samples: 200,
            delay_ms: 5,
        }
    }
}

/// Per-axis offsets in raw counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalibrationOffsets {
    pub accel: [i32; 3],
    pub gyro: [i32; 3],
    /// One-gravity reading at the configured range, removed from Z
    pub gravity: i32,
    /// Offsets are only meaningful when set
    pub calibrated: bool,
}

impl CalibrationOffsets {
    /// Subtract offsets and gravity from a raw reading
    pub fn apply(&self, raw: &RawSample) -> CorrectedSample {
        let mut accel = [0i32; 3];
        let mut gyro = [0i32; 3];
        for axis in 0..3 {
            accel[axis] = raw.accel[axis] as i32 - self.accel[axis];
            gyro[axis] = raw.gyro[axis] as i32 - self.gyro[axis];
        }
        accel[2] -= self.gravity;
        CorrectedSample { accel, gyro }
    }
}

/// Running per-axis sums of successful reads
#[derive(Debug, Default)]
struct MeanAccumulator {
    accel: [i64; 3],
    gyro: [i64; 3],
    count: i64,
}

impl MeanAccumulator {
    fn add(&mut self, raw: &RawSample) {
        for axis in 0..3 {
            self.accel[axis] += raw.accel[axis] as i64;
            self.gyro[axis] += raw.gyro[axis] as i64;
        }
        self.count += 1;
    }

    /// Means of all added samples; `None` if nothing was added
    fn means(&self) -> Option<([i32; 3], [i32; 3])> {
        if self.count == 0 {
            return None;
        }
        let mean = |sum: i64| (sum / self.count) as i32;
        Some((self.accel.map(mean), self.gyro.map(mean)))
    }
}

/// Collect samples at rest and compute offsets.
///
/// Fails with [`ImuError::CalibrationFailed`] when fewer than half of the
/// requested reads succeed.
pub fn calibrate<S, D>(
    sensor: &mut S,
    delay: &mut D,
    params: &CalibrationParameters,
) -> Result<CalibrationOffsets, ImuError>
where
    S: MotionSensor,
    D: DelayNs,
{
    let requested = params.samples;
    let mut accumulator = MeanAccumulator::default();

    for i in 0..requested {
        match sensor.read_raw() {
            Ok(raw) => accumulator.add(&raw),
            Err(e) => log::debug!("Calibration read {} failed: {}", i, e),
        }
        if i + 1 < requested {
            delay.delay_ms(params.delay_ms);
        }
    }

    let good = accumulator.count as u16;
    let failed = ImuError::CalibrationFailed { good, requested };
    if requested == 0 || (good as u32) * 2 < requested as u32 {
        return Err(failed);
    }
    let (accel_mean, gyro_mean) = accumulator.means().ok_or(failed)?;

    let gravity = sensor.config().accel_range.lsb_per_g();
    let offsets = CalibrationOffsets {
        accel: [accel_mean[0], accel_mean[1], accel_mean[2] - gravity],
        gyro: gyro_mean,
        gravity,
        calibrated: true,
    };
    log::info!(
        "IMU calibrated from {}/{} samples: accel {:?} gyro {:?}",
        good,
        requested,
        offsets.accel,
        offsets.gyro
    );
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imu::config::SensorConfig;
    use crate::imu::simulated::NoopDelay;
    use embedded_hal::i2c::ErrorKind;

    /// Replays a fixed list of read results, then repeats the last one
    struct Scripted {
        reads: Vec<Result<RawSample, ImuError>>,
        next: usize,
    }

    impl Scripted {
        fn new(reads: Vec<Result<RawSample, ImuError>>) -> Self {
            Self { reads, next: 0 }
        }
    }

    impl MotionSensor for Scripted {
        fn initialize<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), ImuError> {
            Ok(())
        }

        fn read_raw(&mut self) -> Result<RawSample, ImuError> {
            let i = self.next.min(self.reads.len() - 1);
            self.next += 1;
            self.reads[i]
        }

        fn config(&self) -> SensorConfig {
            SensorConfig::default()
        }
    }

    struct CountingDelay(u32);

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.0 += ms;
        }
    }

    #[test]
    fn test_level_device_reads_zero() {
        let at_rest = RawSample::new([0, 0, 4096], [0, 0, 0]);
        let mut sensor = Scripted::new(vec![Ok(at_rest)]);
        let offsets =
            calibrate(&mut sensor, &mut NoopDelay, &CalibrationParameters::default()).unwrap();

        assert!(offsets.calibrated);
        assert_eq!(offsets.accel, [0, 0, 0]);
        assert_eq!(offsets.gravity, 4096);
        let corrected = offsets.apply(&at_rest);
        assert_eq!(corrected.accel, [0, 0, 0]);
        assert_eq!(corrected.gyro, [0, 0, 0]);
    }

    #[test]
    fn test_biased_device_reads_zero() {
        let at_rest = RawSample::new([37, -12, 4180], [5, -3, 9]);
        let mut sensor = Scripted::new(vec![Ok(at_rest)]);
        let offsets =
            calibrate(&mut sensor, &mut NoopDelay, &CalibrationParameters::default()).unwrap();

        assert_eq!(offsets.accel, [37, -12, 84]);
        assert_eq!(offsets.gyro, [5, -3, 9]);
        let corrected = offsets.apply(&at_rest);
        assert_eq!(corrected.accel, [0, 0, 0]);
        assert_eq!(corrected.gyro, [0, 0, 0]);
    }

    #[test]
    fn test_too_many_failures() {
        let bad = Err(ImuError::Bus(ErrorKind::Bus));
        let good = Ok(RawSample::new([0, 0, 4096], [0; 3]));
        let mut reads = vec![bad; 150];
        reads.extend(std::iter::repeat_n(good, 50));
        let mut sensor = Scripted::new(reads);

        let result = calibrate(&mut sensor, &mut NoopDelay, &CalibrationParameters::default());
        assert_eq!(
            result,
            Err(ImuError::CalibrationFailed {
                good: 50,
                requested: 200
            })
        );
    }

    #[test]
    fn test_half_success_is_enough() {
        let bad = Err(ImuError::Bus(ErrorKind::Bus));
        let good = Ok(RawSample::new([10, 0, 4096], [0; 3]));
        let mut reads = vec![bad; 100];
        reads.extend(std::iter::repeat_n(good, 100));
        let mut sensor = Scripted::new(reads);

        let offsets =
            calibrate(&mut sensor, &mut NoopDelay, &CalibrationParameters::default()).unwrap();
        // Failed reads do not drag the mean toward zero
        assert_eq!(offsets.accel[0], 10);
    }

    #[test]
    fn test_zero_samples_fails() {
        let mut sensor = Scripted::new(vec![Ok(RawSample::default())]);
        let params = CalibrationParameters {
            samples: 0,
            delay_ms: 5,
        };
        assert!(calibrate(&mut sensor, &mut NoopDelay, &params).is_err());
    }

    #[test]
    fn test_blocks_for_full_duration() {
        let mut sensor = Scripted::new(vec![Ok(RawSample::default())]);
        let mut delay = CountingDelay(0);
        let _ = calibrate(&mut sensor, &mut delay, &CalibrationParameters::default());
        assert_eq!(delay.0, 199 * 5);
    }
}
