//! Slip/skid ball

use crate::config::{ConfigError, SlipSpec};
use crate::mapping::{Freshness, Redraw};

use super::{sanitize, LowPass};

/// Bank angle the ball settles at for the given body accelerations (deg)
///
/// Both zero (no gravity vector at all) reads as centred.
pub fn slip_angle_deg(lateral: f32, vertical: f32) -> f32 {
    sanitize(libm::atanf(lateral / vertical)).to_degrees()
}

/// Slip ball driven by low-passed lateral and vertical acceleration
#[derive(Debug, Clone)]
pub struct SlipBall {
    spec: SlipSpec,
    lateral: LowPass,
    vertical: LowPass,
    freshness: Freshness<f32>,
    offset_px: f32,
}

impl SlipBall {
    pub fn new(spec: SlipSpec) -> Result<Self, ConfigError> {
        for length in [spec.max_deflection_deg, spec.travel_px] {
            if !(length.is_finite() && length > 0.0) {
                return Err(ConfigError::NonPositiveLength);
            }
        }
        Ok(Self {
            spec,
            lateral: LowPass::new(spec.time_constant_ms)?,
            vertical: LowPass::new(spec.time_constant_ms)?,
            freshness: Freshness::new(),
            offset_px: 0.0,
        })
    }

    /// Ball offset from centre for a deflection angle, clamped to the tube
    pub fn offset_for(&self, angle_deg: f32) -> f32 {
        let max = self.spec.max_deflection_deg;
        angle_deg.clamp(-max, max) / max * self.spec.travel_px
    }

    /// Feed accelerations; missing either axis marks the ball invalid
    pub fn update(&mut self, lateral: Option<f32>, vertical: Option<f32>, now_ms: u32) -> Redraw {
        let (Some(lateral), Some(vertical)) = (lateral, vertical) else {
            return self.freshness.invalidate().into();
        };
        let lateral = self.lateral.update(lateral, now_ms);
        let vertical = self.vertical.update(vertical, now_ms);
        let offset_px = self.offset_for(slip_angle_deg(lateral, vertical));
        let changed = self.freshness.accept(offset_px);
        self.offset_px = offset_px;
        changed.into()
    }

    pub fn offset_px(&self) -> f32 {
        self.offset_px
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle() {
        assert_eq!(slip_angle_deg(0.0, 9.81), 0.0);
        assert!((slip_angle_deg(1.0, 1.0) - 45.0).abs() < 1e-4);
        assert_eq!(slip_angle_deg(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_offset_clamped_to_tube() {
        let ball = SlipBall::new(SlipSpec::default()).unwrap();
        assert_eq!(ball.offset_for(5.0), 15.0);
        assert_eq!(ball.offset_for(-45.0), -30.0);
    }

    #[test]
    fn test_ball_smooths_step() {
        let mut ball = SlipBall::new(SlipSpec::default()).unwrap();
        assert_eq!(ball.update(Some(0.0), Some(9.81), 0), Redraw::Needed);
        assert_eq!(ball.offset_px(), 0.0);
        ball.update(Some(9.81), Some(9.81), 20);
        // A tenth of the way to 45°, well short of the tube end
        let offset = ball.offset_px();
        assert!(offset > 0.0 && offset < 30.0);
    }

    #[test]
    fn test_nan_acceleration_stays_finite() {
        let mut ball = SlipBall::new(SlipSpec::default()).unwrap();
        ball.update(Some(f32::NAN), Some(f32::NAN), 0);
        assert!(ball.is_valid());
        assert_eq!(ball.offset_px(), 0.0);
    }

    #[test]
    fn test_missing_axis_invalidates() {
        let mut ball = SlipBall::new(SlipSpec::default()).unwrap();
        ball.update(Some(0.5), Some(9.81), 0);
        assert_eq!(ball.update(None, Some(9.81), 20), Redraw::Needed);
        assert!(!ball.is_valid());
    }
}
