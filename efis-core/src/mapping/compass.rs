//! Compass mapping (heading ribbon and HSI dial)
//!
//! Headings are degrees normalized to `[0, 360)`. Ribbon offsets are pixels
//! from the centre line, positive to the right.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{CompassSpec, ConfigError, DialSpec, MAX_COMPASS_TICKS};

use super::{finite, Freshness, Redraw};

/// Normalize any angle in degrees to `[0, 360)`
pub fn normalize_degrees(value: f32) -> f32 {
    let wrapped = (value % 360.0 + 360.0) % 360.0;
    // -tiny % 360 + 360 rounds to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Rounded heading as three digits, `"000"` to `"359"`
pub fn heading_readout(value: f32) -> String<3> {
    let mut rounded = libm::roundf(normalize_degrees(value)) as u16;
    if rounded >= 360 {
        rounded = 0;
    }
    let mut text = String::new();
    // Three digits always fit
    let _ = write!(text, "{:03}", rounded);
    text
}

/// One tick on the heading ribbon
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassTick {
    pub offset_px: f32,
    /// Labelled tick; `None` for the minor ticks between labels
    pub label: Option<u16>,
}

/// Heading ribbon state for one heading
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassFrame {
    pub heading: f32,
    pub readout: String<3>,
    pub ticks: Vec<CompassTick, MAX_COMPASS_TICKS>,
    pub bug_offset_px: Option<f32>,
}

/// Heading ribbon with wraparound at the 0/360 seam
#[derive(Debug, Clone)]
pub struct CompassWrapMapper {
    spec: CompassSpec,
    overscan_deg: f32,
    freshness: Freshness<(f32, Option<f32>)>,
    frame: CompassFrame,
}

impl CompassWrapMapper {
    pub fn new(spec: CompassSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        let spacing = f32::from(spec.label_spacing_deg);
        let spacing_px = spacing * spec.px_per_degree;
        Ok(Self {
            spec,
            overscan_deg: libm::ceilf(spec.width_px / 2.0 / spacing_px) * spacing,
            freshness: Freshness::new(),
            frame: CompassFrame::default(),
        })
    }

    /// Degrees of ribbon replicated beyond each end of the scale
    pub fn overscan_deg(&self) -> f32 {
        self.overscan_deg
    }

    /// Bug value as seen from `heading`, shifted by a full turn when the two
    /// sit either side of the seam
    pub fn effective_bug(&self, heading: f32, bug: f32) -> f32 {
        let heading = normalize_degrees(heading);
        let bug = normalize_degrees(bug);
        if heading < self.overscan_deg && bug > 360.0 - self.overscan_deg {
            bug - 360.0
        } else if heading > 360.0 - self.overscan_deg && bug < self.overscan_deg {
            bug + 360.0
        } else {
            bug
        }
    }

    /// Angular offset of the bug from the centre line
    pub fn bug_offset_deg(&self, heading: f32, bug: f32) -> f32 {
        self.effective_bug(heading, bug) - normalize_degrees(heading)
    }

    /// Visible ticks, leftmost first
    pub fn ticks(&self, heading: f32) -> Vec<CompassTick, MAX_COMPASS_TICKS> {
        let heading = normalize_degrees(heading);
        let spacing = self.spec.label_spacing_deg;
        let minor = f32::from(spacing) / 2.0;
        let half = self.spec.half_visible_deg();

        let mut ticks = Vec::new();
        let mut degree = libm::ceilf((heading - half) / minor) * minor;
        while degree <= heading + half {
            let wrapped = normalize_degrees(degree);
            let whole = libm::roundf(wrapped) as u16;
            let label = (whole % spacing == 0 && libm::fabsf(wrapped - f32::from(whole)) < 1e-3)
                .then_some(whole);
            let tick = CompassTick {
                offset_px: (degree - heading) * self.spec.px_per_degree,
                label,
            };
            if ticks.push(tick).is_err() {
                break;
            }
            degree += minor;
        }
        ticks
    }

    /// Compute the frame for `heading` without touching cached state
    pub fn map(&self, heading: f32, bug: Option<f32>) -> CompassFrame {
        let normalized = normalize_degrees(heading);
        CompassFrame {
            heading: normalized,
            readout: heading_readout(normalized),
            ticks: self.ticks(normalized),
            bug_offset_px: finite(bug)
                .map(|b| self.bug_offset_deg(normalized, b) * self.spec.px_per_degree),
        }
    }

    pub fn update(&mut self, heading: Option<f32>, bug: Option<f32>) -> Redraw {
        match finite(heading) {
            Some(heading) => {
                let key = (normalize_degrees(heading), finite(bug).map(normalize_degrees));
                if self.freshness.accept(key) {
                    self.frame = self.map(key.0, key.1);
                    Redraw::Needed
                } else {
                    Redraw::Skip
                }
            }
            None => self.freshness.invalidate().into(),
        }
    }

    pub fn frame(&self) -> &CompassFrame {
        &self.frame
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}

/// Navigation source to/from indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToFrom {
    To,
    From,
}

/// Inputs to the HSI for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialInput {
    pub heading: Option<f32>,
    pub bug: Option<f32>,
    pub ground_track: Option<f32>,
    pub desired_track: Option<f32>,
    /// Cross-track error in NM, positive right of course
    pub cross_track_nm: Option<f32>,
    pub to_from: Option<ToFrom>,
}

/// Course deviation bar
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deviation {
    pub offset_px: f32,
    pub to_from: Option<ToFrom>,
}

/// HSI state: card rotation and pointer angles relative to the card
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialFrame {
    /// Rotation applied to the compass card
    pub card_rotation_deg: f32,
    pub bug_deg: Option<f32>,
    pub ground_track_deg: Option<f32>,
    pub desired_track_deg: Option<f32>,
    pub deviation: Option<Deviation>,
}

/// Rotating compass card (HSI)
#[derive(Debug, Clone)]
pub struct DialMapper {
    spec: DialSpec,
    freshness: Freshness<DialInput>,
    frame: DialFrame,
}

impl DialMapper {
    pub fn new(spec: DialSpec) -> Result<Self, ConfigError> {
        for length in [spec.cdi_full_scale_nm, spec.cdi_max_offset_px] {
            if !(length.is_finite() && length > 0.0) {
                return Err(ConfigError::NonPositiveLength);
            }
        }
        Ok(Self {
            spec,
            freshness: Freshness::new(),
            frame: DialFrame::default(),
        })
    }

    /// Pointer angle for `target` on a card turned to `heading`
    pub fn relative(heading: f32, target: f32) -> f32 {
        normalize_degrees(target - normalize_degrees(heading))
    }

    /// Course deviation bar offset, clamped to full scale
    pub fn deviation_px(&self, cross_track_nm: f32) -> f32 {
        let max = self.spec.cdi_max_offset_px;
        (cross_track_nm / self.spec.cdi_full_scale_nm * max).clamp(-max, max)
    }

    /// Compute the frame; `None` without a heading
    pub fn map(&self, input: &DialInput) -> Option<DialFrame> {
        let heading = normalize_degrees(finite(input.heading)?);
        let pointer = |target: Option<f32>| finite(target).map(|t| Self::relative(heading, t));
        Some(DialFrame {
            card_rotation_deg: -heading,
            bug_deg: pointer(input.bug),
            ground_track_deg: pointer(input.ground_track),
            desired_track_deg: pointer(input.desired_track),
            deviation: finite(input.cross_track_nm).map(|nm| Deviation {
                offset_px: self.deviation_px(nm),
                to_from: input.to_from,
            }),
        })
    }

    pub fn update(&mut self, input: &DialInput) -> Redraw {
        match self.map(input) {
            Some(frame) => {
                if self.freshness.accept(*input) {
                    self.frame = frame;
                    Redraw::Needed
                } else {
                    Redraw::Skip
                }
            }
            None => self.freshness.invalidate().into(),
        }
    }

    pub fn frame(&self) -> &DialFrame {
        &self.frame
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}
