//! First-order exponential low-pass filter

use crate::config::ConfigError;

use super::{elapsed_ms, sanitize};

/// Exponential smoothing `s ← s + Δt·(x − s)/τ`
///
/// The first sample seeds the state. The gain `Δt/τ` is capped at 1 so a
/// long gap jumps to the sample instead of overshooting it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowPass {
    time_constant_ms: f32,
    state: Option<f32>,
    last_ms: u32,
}

impl LowPass {
    pub fn new(time_constant_ms: f32) -> Result<Self, ConfigError> {
        if !(time_constant_ms.is_finite() && time_constant_ms > 0.0) {
            return Err(ConfigError::NonPositiveTimeConstant);
        }
        Ok(Self {
            time_constant_ms,
            state: None,
            last_ms: 0,
        })
    }

    /// Feed a sample taken at `now_ms` and return the filtered value
    pub fn update(&mut self, sample: f32, now_ms: u32) -> f32 {
        let sample = sanitize(sample);
        let next = match self.state {
            Some(state) => {
                let dt = elapsed_ms(self.last_ms, now_ms) as f32;
                let gain = (dt / self.time_constant_ms).min(1.0);
                state + gain * (sample - state)
            }
            None => sample,
        };
        self.state = Some(next);
        self.last_ms = now_ms;
        next
    }

    /// Filtered value, `None` before the first sample
    pub fn value(&self) -> Option<f32> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_time_constant() {
        assert_eq!(
            LowPass::new(0.0).unwrap_err(),
            ConfigError::NonPositiveTimeConstant
        );
        assert!(LowPass::new(f32::NAN).is_err());
    }

    #[test]
    fn test_first_sample_seeds() {
        let mut lp = LowPass::new(200.0).unwrap();
        assert_eq!(lp.value(), None);
        assert_eq!(lp.update(4.0, 1000), 4.0);
    }

    #[test]
    fn test_step_uses_elapsed_time() {
        let mut lp = LowPass::new(200.0).unwrap();
        lp.update(0.0, 0);
        // 20 ms of a 200 ms time constant moves a tenth of the way
        assert!((lp.update(10.0, 20) - 1.0).abs() < 1e-5);
        // Twice the gap, twice the gain
        assert!((lp.update(10.0, 60) - 2.8).abs() < 1e-5);
    }

    #[test]
    fn test_long_gap_does_not_overshoot() {
        let mut lp = LowPass::new(200.0).unwrap();
        lp.update(0.0, 0);
        assert_eq!(lp.update(5.0, 10_000), 5.0);
    }

    #[test]
    fn test_nan_sample_treated_as_zero() {
        let mut lp = LowPass::new(100.0).unwrap();
        lp.update(10.0, 0);
        let out = lp.update(f32::NAN, 50);
        assert!(out.is_finite());
        assert!((out - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut lp = LowPass::new(100.0).unwrap();
        lp.update(10.0, 0);
        lp.reset();
        assert_eq!(lp.update(-3.0, 10), -3.0);
    }
}
