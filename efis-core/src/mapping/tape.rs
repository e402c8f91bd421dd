//! Scrolling tape mapping (altimeter and airspeed ribbons)
//!
//! Offsets are in pixels relative to the tape's centre line, positive
//! downwards, so a larger value sits above the centre (negative offset).

use heapless::Vec;

use crate::config::{BandColour, ColourBand, ConfigError, TapeSpec, MAX_TAPE_LABELS};

use super::{finite, Freshness, Redraw};

/// One labelled major tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapeLabel {
    /// Number printed on the label
    pub value: i32,
    /// Vertical offset from the centre line
    pub offset_px: f32,
    /// False when the label would show a negative number on a tape that
    /// does not allow them
    pub visible: bool,
}

/// Everything a tape renderer needs for one value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapeFrame {
    /// Translation of the repeating ruler graphic
    pub ruler_offset_px: f32,
    /// `major_interval_count + 1` labels, lowest row first
    pub labels: Vec<TapeLabel, MAX_TAPE_LABELS>,
    /// Bug position, if the tape has a bug value
    pub bug_offset_px: Option<f32>,
}

/// Pixel extent of a colour band, clipped to the visible window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandExtent {
    pub top_px: f32,
    pub bottom_px: f32,
    pub colour: BandColour,
}

/// Linear scrolling tape
#[derive(Debug, Clone)]
pub struct TapeMapper {
    spec: TapeSpec,
    px_per_unit: f32,
    ruler_zero_offset: f32,
    freshness: Freshness<(f32, Option<f32>)>,
    frame: TapeFrame,
}

impl TapeMapper {
    pub fn new(spec: TapeSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        let interval = f32::from(spec.major_interval_size);
        let count = f32::from(spec.major_interval_count);
        Ok(Self {
            spec,
            px_per_unit: spec.height_px / count / interval,
            // Half the visible span plus one interval
            ruler_zero_offset: (count + 2.0) / 2.0 * interval,
            freshness: Freshness::new(),
            frame: TapeFrame::default(),
        })
    }

    pub fn spec(&self) -> &TapeSpec {
        &self.spec
    }

    pub fn px_per_unit(&self) -> f32 {
        self.px_per_unit
    }

    /// Value below which a tape without negatives stops scrolling
    pub fn ruler_zero_offset(&self) -> f32 {
        self.ruler_zero_offset
    }

    /// Spacing of minor ticks on the ruler graphic
    pub fn minor_spacing_px(&self) -> f32 {
        let minor = f32::from(self.spec.minor_per_major.max(1));
        f32::from(self.spec.major_interval_size) * self.px_per_unit / minor
    }

    /// `value` truncated toward zero to a whole major interval
    pub fn value_interval(&self, value: f32) -> f32 {
        value - value % f32::from(self.spec.major_interval_size)
    }

    /// Compute the frame for `value` without touching cached state
    pub fn map(&self, value: f32, bug: Option<f32>) -> TapeFrame {
        let interval = f32::from(self.spec.major_interval_size);
        let value_interval = self.value_interval(value);
        // Sign follows value
        let remainder = value % interval;

        let ruler_offset_px = if !self.spec.allow_negative && value < self.ruler_zero_offset {
            (value - self.ruler_zero_offset) * self.px_per_unit
        } else {
            remainder * self.px_per_unit
        };

        // Past the half interval every row moves up one: the top label
        // recycles to the bottom of the window
        let half = i32::from(self.spec.major_interval_count) / 2;
        let shift = if remainder < interval / 2.0 { 0 } else { 1 };

        let mut labels = Vec::new();
        for i in 0..=i32::from(self.spec.major_interval_count) {
            let row = (i - half + shift) as f32;
            let number = row * interval + value_interval;
            let label = TapeLabel {
                value: number as i32,
                offset_px: (remainder - row * interval) * self.px_per_unit,
                visible: self.spec.allow_negative || number >= 0.0,
            };
            if labels.push(label).is_err() {
                break;
            }
        }

        TapeFrame {
            ruler_offset_px,
            labels,
            bug_offset_px: finite(bug).map(|b| -(b - value) * self.px_per_unit),
        }
    }

    /// Feed the latest value; `None` or a non-finite value marks the tape
    /// invalid and keeps the last frame
    pub fn update(&mut self, value: Option<f32>, bug: Option<f32>) -> Redraw {
        match finite(value) {
            Some(value) => {
                let bug = finite(bug);
                if self.freshness.accept((value, bug)) {
                    self.frame = self.map(value, bug);
                    Redraw::Needed
                } else {
                    Redraw::Skip
                }
            }
            None => self.freshness.invalidate().into(),
        }
    }

    pub fn frame(&self) -> &TapeFrame {
        &self.frame
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }

    /// Where `band` sits on the tape at `value`, or `None` if it is entirely
    /// outside the visible window
    pub fn band_extent(&self, band: &ColourBand, value: f32) -> Option<BandExtent> {
        let half = self.spec.height_px / 2.0;
        let top = (value - band.to) * self.px_per_unit;
        let bottom = (value - band.from) * self.px_per_unit;
        if bottom < -half || top > half {
            return None;
        }
        Some(BandExtent {
            top_px: top.max(-half),
            bottom_px: bottom.min(half),
            colour: band.colour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn altitude() -> TapeMapper {
        TapeMapper::new(TapeSpec::altitude()).unwrap()
    }

    fn airspeed() -> TapeMapper {
        TapeMapper::new(TapeSpec::airspeed()).unwrap()
    }

    fn values(frame: &TapeFrame) -> heapless::Vec<i32, MAX_TAPE_LABELS> {
        frame.labels.iter().map(|l| l.value).collect()
    }

    #[test]
    fn test_odd_interval_count_fails_fast() {
        let spec = TapeSpec {
            major_interval_count: 3,
            ..TapeSpec::altitude()
        };
        assert_eq!(
            TapeMapper::new(spec).unwrap_err(),
            ConfigError::OddMajorIntervalCount(3)
        );
    }

    #[test]
    fn test_scale() {
        let tape = altitude();
        // 340 px over 4 × 100 ft
        assert!((tape.px_per_unit() - 0.85).abs() < 1e-6);
        assert_eq!(tape.ruler_zero_offset(), 300.0);
        assert!((tape.minor_spacing_px() - 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_labels_below_half_interval() {
        let tape = altitude();
        let frame = tape.map(1234.0, None);
        assert_eq!(values(&frame).as_slice(), &[1000, 1100, 1200, 1300, 1400]);
        // 1200 sits 34 ft below the pointer
        assert!((frame.labels[2].offset_px - 34.0 * 0.85).abs() < 1e-3);
        assert!((frame.ruler_offset_px - 34.0 * 0.85).abs() < 1e-3);
    }

    #[test]
    fn test_labels_recycle_past_half_interval() {
        let tape = altitude();
        let frame = tape.map(1260.0, None);
        assert_eq!(values(&frame).as_slice(), &[1100, 1200, 1300, 1400, 1500]);
    }

    #[test]
    fn test_recycle_keeps_shared_labels_in_place() {
        let tape = altitude();
        let before = tape.map(1249.99, None);
        let after = tape.map(1250.01, None);
        for label in &before.labels {
            if let Some(same) = after.labels.iter().find(|l| l.value == label.value) {
                assert!((same.offset_px - label.offset_px).abs() < 0.1);
            }
        }
    }

    #[test]
    fn test_negative_values_truncate_toward_zero() {
        let tape = altitude();
        assert_eq!(tape.value_interval(-30.0), 0.0);
        assert_eq!(tape.value_interval(-130.0), -100.0);
        let frame = tape.map(-30.0, None);
        assert_eq!(values(&frame).as_slice(), &[-200, -100, 0, 100, 200]);
        assert!(frame.labels.iter().all(|l| l.visible));
        assert!((frame.ruler_offset_px + 30.0 * 0.85).abs() < 1e-3);
    }

    #[test]
    fn test_ruler_pins_near_zero_without_negatives() {
        let tape = airspeed();
        // 340 px over 4 × 10 kt
        let frame = tape.map(2.0, None);
        assert!((frame.ruler_offset_px - (2.0 - 30.0) * 8.5).abs() < 1e-3);
        assert_eq!(values(&frame).as_slice(), &[-20, -10, 0, 10, 20]);
        assert!(!frame.labels[0].visible);
        assert!(!frame.labels[1].visible);
        assert!(frame.labels[2].visible);

        let frame = tape.map(42.0, None);
        assert!((frame.ruler_offset_px - 2.0 * 8.5).abs() < 1e-3);
    }

    #[test]
    fn test_ruler_continuous_through_zero_offset() {
        let tape = airspeed();
        let offsets = [29.99, 30.0, 30.01].map(|v| tape.map(v, None).ruler_offset_px);
        assert!((offsets[0] + 0.085).abs() < 1e-3);
        assert!(offsets[1].abs() < 1e-6);
        assert!((offsets[2] - 0.085).abs() < 1e-3);
    }

    #[test]
    fn test_ruler_wraps_one_interval_at_boundary() {
        let tape = altitude();
        let below = tape.map(399.99, None).ruler_offset_px;
        let at = tape.map(400.0, None).ruler_offset_px;
        assert!((below - 99.99 * 0.85).abs() < 1e-2);
        assert_eq!(at, 0.0);
        assert!(((below - at) - 100.0 * 0.85).abs() < 0.02);
    }

    #[test]
    fn test_bug_offset_relative_to_value() {
        let tape = altitude();
        let frame = tape.map(1000.0, Some(1500.0));
        assert_eq!(frame.bug_offset_px, Some(-500.0 * 0.85));
        let frame = tape.map(1100.0, Some(1500.0));
        assert!((frame.bug_offset_px.unwrap() + 400.0 * 0.85).abs() < 1e-3);
        assert_eq!(tape.map(1000.0, Some(f32::NAN)).bug_offset_px, None);
    }

    #[test]
    fn test_update_redraw_protocol() {
        let mut tape = altitude();
        assert_eq!(tape.update(None, None), Redraw::Skip);
        assert!(!tape.is_valid());
        assert_eq!(tape.update(Some(500.0), None), Redraw::Needed);
        assert_eq!(tape.update(Some(500.0), None), Redraw::Skip);
        assert_eq!(tape.update(Some(500.0), Some(700.0)), Redraw::Needed);
        assert_eq!(tape.update(Some(f32::NAN), None), Redraw::Needed);
        assert!(!tape.is_valid());
        // Last frame kept while invalid
        assert_eq!(tape.frame().labels[2].value, 500);
        assert_eq!(tape.update(None, None), Redraw::Skip);
        assert_eq!(tape.update(Some(500.0), Some(700.0)), Redraw::Needed);
    }

    #[test]
    fn test_band_extent_clipped() {
        let tape = airspeed();
        let green = ColourBand::new(40.0, 108.0, BandColour::Green);
        let extent = tape.band_extent(&green, 100.0).unwrap();
        assert!((extent.top_px + 68.0).abs() < 1e-3);
        assert_eq!(extent.bottom_px, 170.0);
        assert_eq!(extent.colour, BandColour::Green);

        let red = ColourBand::new(171.0, 300.0, BandColour::Red);
        assert_eq!(tape.band_extent(&red, 100.0), None);
    }
}
