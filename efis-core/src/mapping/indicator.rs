//! Bar indicators (vertical speed, turn rate)

use crate::config::{ConfigError, TurnSpec, VsiSpec};

use super::{finite, Freshness, Redraw};

/// Standard rate turn (deg/s)
pub const STANDARD_RATE_DEG_S: f32 = 3.0;

/// Vertical speed bar with a compressed scale above 1000 fpm
#[derive(Debug, Clone)]
pub struct VsiMapper {
    spec: VsiSpec,
    freshness: Freshness<f32>,
    bar_px: f32,
}

impl VsiMapper {
    pub fn new(spec: VsiSpec) -> Result<Self, ConfigError> {
        for length in [spec.one_thousand_px, spec.two_thousand_px, spec.max_fpm] {
            if !(length.is_finite() && length > 0.0) {
                return Err(ConfigError::NonPositiveLength);
            }
        }
        Ok(Self {
            spec,
            freshness: Freshness::new(),
            bar_px: 0.0,
        })
    }

    /// Bar length for `fpm`, positive up
    pub fn bar_px(&self, fpm: f32) -> f32 {
        let thousands = (libm::fabsf(fpm) / 1000.0).min(self.spec.max_fpm / 1000.0);
        let length = if thousands < 1.0 {
            thousands * self.spec.one_thousand_px
        } else {
            self.spec.one_thousand_px + (thousands - 1.0) * self.spec.two_thousand_px
        };
        if fpm < 0.0 {
            -length
        } else {
            length
        }
    }

    pub fn update(&mut self, fpm: Option<f32>) -> Redraw {
        match finite(fpm) {
            Some(fpm) => {
                let bar_px = self.bar_px(fpm);
                let changed = self.freshness.accept(bar_px);
                self.bar_px = bar_px;
                changed.into()
            }
            None => self.freshness.invalidate().into(),
        }
    }

    /// Last bar length
    pub fn current_px(&self) -> f32 {
        self.bar_px
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}

/// Turn rate bar fed with the spring-filtered rate
#[derive(Debug, Clone)]
pub struct TurnBarMapper {
    spec: TurnSpec,
    freshness: Freshness<Option<f32>>,
    bar_px: Option<f32>,
}

impl TurnBarMapper {
    pub fn new(spec: TurnSpec) -> Result<Self, ConfigError> {
        for length in [spec.px_per_deg_s, spec.max_rate_deg_s] {
            if !(length.is_finite() && length > 0.0) {
                return Err(ConfigError::NonPositiveLength);
            }
        }
        spec.spring.validate()?;
        Ok(Self {
            spec,
            freshness: Freshness::new(),
            bar_px: None,
        })
    }

    /// Bar width for `rate_deg_s`, positive right; `None` under one pixel
    pub fn bar_px(&self, rate_deg_s: f32) -> Option<f32> {
        let max = self.spec.max_rate_deg_s;
        let width = rate_deg_s.clamp(-max, max) * self.spec.px_per_deg_s;
        (libm::fabsf(width) >= 1.0).then_some(width)
    }

    /// Position of the standard rate marks either side of centre
    pub fn standard_rate_px(&self) -> f32 {
        STANDARD_RATE_DEG_S * self.spec.px_per_deg_s
    }

    pub fn update(&mut self, rate_deg_s: Option<f32>) -> Redraw {
        match finite(rate_deg_s) {
            Some(rate) => {
                let bar_px = self.bar_px(rate);
                let changed = self.freshness.accept(bar_px);
                self.bar_px = bar_px;
                changed.into()
            }
            None => self.freshness.invalidate().into(),
        }
    }

    pub fn current_px(&self) -> Option<f32> {
        self.bar_px
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vsi_piecewise_scale() {
        let vsi = VsiMapper::new(VsiSpec::default()).unwrap();
        assert_eq!(vsi.bar_px(0.0), 0.0);
        assert_eq!(vsi.bar_px(500.0), 60.0);
        assert_eq!(vsi.bar_px(1000.0), 120.0);
        assert_eq!(vsi.bar_px(1500.0), 140.0);
        assert_eq!(vsi.bar_px(-1500.0), -140.0);
        // Clamped to 2000 fpm
        assert_eq!(vsi.bar_px(5000.0), 160.0);
    }

    #[test]
    fn test_vsi_missing_data() {
        let mut vsi = VsiMapper::new(VsiSpec::default()).unwrap();
        assert_eq!(vsi.update(Some(500.0)), Redraw::Needed);
        assert_eq!(vsi.update(Some(500.0)), Redraw::Skip);
        assert_eq!(vsi.update(None), Redraw::Needed);
        assert!(!vsi.is_valid());
        assert_eq!(vsi.current_px(), 60.0);
    }

    #[test]
    fn test_turn_bar_clamped() {
        let turn = TurnBarMapper::new(TurnSpec::default()).unwrap();
        assert_eq!(turn.bar_px(3.0), Some(54.0));
        assert_eq!(turn.bar_px(-10.0), Some(-108.0));
        assert_eq!(turn.standard_rate_px(), 54.0);
    }

    #[test]
    fn test_turn_bar_hidden_under_one_pixel() {
        let mut turn = TurnBarMapper::new(TurnSpec::default()).unwrap();
        assert_eq!(turn.bar_px(0.05), None);
        assert_eq!(turn.update(Some(0.01)), Redraw::Needed);
        // Still no bar: nothing to redraw
        assert_eq!(turn.update(Some(0.02)), Redraw::Skip);
        assert_eq!(turn.current_px(), None);
    }
}
