//! Exponential moving average over the six IMU channels

use super::sample::ImuSample;

/// One EMA step: `α·raw + (1−α)·prev` on every channel.
///
/// The result carries the raw sample's timestamp.
pub fn ema(prev: &ImuSample, raw: &ImuSample, alpha: f32) -> ImuSample {
    let alpha = alpha.clamp(0.0, 1.0);
    ImuSample {
        accel: raw.accel * alpha + prev.accel * (1.0 - alpha),
        gyro: raw.gyro * alpha + prev.gyro * (1.0 - alpha),
        timestamp_ms: raw.timestamp_ms,
    }
}

/// EMA that remembers its previous output
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    alpha: f32,
    prev: Option<ImuSample>,
}

impl LowPassFilter {
    /// `alpha` near 1.0 tracks the input closely; near 0.0 smooths heavily
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            prev: None,
        }
    }

    /// Feed a sample and get the smoothed one. The first sample after a
    /// reset passes through unchanged.
    pub fn apply(&mut self, raw: &ImuSample) -> ImuSample {
        let out = match &self.prev {
            Some(prev) => ema(prev, raw, self.alpha),
            None => *raw,
        };
        self.prev = Some(out);
        out
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample(ax: f32, t: u64) -> ImuSample {
        ImuSample {
            accel: Vec3::new(ax, 0.0, 0.0),
            gyro: Vec3::new(0.0, 0.0, ax),
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_ema_weights() {
        let out = ema(&sample(0.0, 0), &sample(10.0, 5), 0.7);
        assert!((out.accel.x - 7.0).abs() < 1e-5);
        assert!((out.gyro.z - 7.0).abs() < 1e-5);
        assert_eq!(out.timestamp_ms, 5);
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = LowPassFilter::new(0.5);
        let out = filter.apply(&sample(4.0, 1));
        assert_eq!(out.accel.x, 4.0);
    }

    #[test]
    fn test_converges_on_step() {
        let mut filter = LowPassFilter::new(0.9);
        filter.apply(&sample(0.0, 0));
        let mut out = sample(0.0, 0);
        for t in 1..10 {
            out = filter.apply(&sample(1.0, t));
        }
        assert!(out.accel.x > 0.999);
        assert!(out.accel.x <= 1.0);
    }

    #[test]
    fn test_alpha_one_is_passthrough() {
        let mut filter = LowPassFilter::new(1.0);
        filter.apply(&sample(3.0, 0));
        assert_eq!(filter.apply(&sample(-2.0, 1)).accel.x, -2.0);
    }

    #[test]
    fn test_reset() {
        let mut filter = LowPassFilter::new(0.5);
        filter.apply(&sample(8.0, 0));
        filter.reset();
        assert_eq!(filter.apply(&sample(2.0, 1)).accel.x, 2.0);
    }
}
