//! Configuration type definitions
//!
//! Every tunable of the panel lives here. `PanelConfig::default()` describes
//! the reference instrument layout; `validate()` rejects anything the
//! mappers cannot work with.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Maximum major intervals on a tape
pub const MAX_MAJOR_INTERVALS: u8 = 8;

/// Maximum labels on a tape (one more than the major interval count)
pub const MAX_TAPE_LABELS: usize = MAX_MAJOR_INTERVALS as usize + 1;

/// Maximum ticks generated for the visible compass ribbon
pub const MAX_COMPASS_TICKS: usize = 48;

/// Maximum colour bands on a tape
pub const MAX_COLOUR_BANDS: usize = 4;

/// Side of the tape the tick marks are drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Alignment {
    Left,
    #[default]
    Right,
}

/// Scrolling tape geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapeSpec {
    /// Value units between labelled marks
    pub major_interval_size: u16,
    /// Major intervals visible in the tape height (must be even)
    pub major_interval_count: u8,
    /// Minor tick divisions per major interval
    pub minor_per_major: u8,
    /// Show negative labels and scroll below zero
    pub allow_negative: bool,
    /// Tick side
    pub alignment: Alignment,
    /// Visible tape height in pixels
    pub height_px: f32,
    /// Bug units per encoder detent, `None` for a tape without a bug
    pub bug_step: Option<u16>,
}

impl TapeSpec {
    /// Altimeter tape: 100 ft majors, negative altitudes allowed, with bug
    pub const fn altitude() -> Self {
        Self {
            major_interval_size: 100,
            major_interval_count: 4,
            minor_per_major: 5,
            allow_negative: true,
            alignment: Alignment::Right,
            height_px: 340.0,
            bug_step: Some(100),
        }
    }

    /// Airspeed tape: 10 kt majors, pinned at zero
    pub const fn airspeed() -> Self {
        Self {
            major_interval_size: 10,
            major_interval_count: 4,
            minor_per_major: 2,
            allow_negative: false,
            alignment: Alignment::Left,
            height_px: 340.0,
            bug_step: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.major_interval_size == 0 {
            return Err(ConfigError::ZeroMajorIntervalSize);
        }
        if self.major_interval_count % 2 != 0 {
            return Err(ConfigError::OddMajorIntervalCount(self.major_interval_count));
        }
        if self.major_interval_count == 0 || self.major_interval_count > MAX_MAJOR_INTERVALS {
            return Err(ConfigError::TooManyLabels(self.major_interval_count));
        }
        if self.bug_step == Some(0) {
            return Err(ConfigError::ZeroStep);
        }
        positive(self.height_px)
    }
}

/// Colour of a tape band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BandColour {
    White,
    Green,
    Yellow,
    Red,
}

/// Coloured value range painted alongside a tape (airspeed arcs)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColourBand {
    pub from: f32,
    pub to: f32,
    pub colour: BandColour,
}

impl ColourBand {
    pub const fn new(from: f32, to: f32, colour: BandColour) -> Self {
        Self { from, to, colour }
    }
}

/// Heading ribbon geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompassSpec {
    /// Horizontal pixels per degree of heading
    pub px_per_degree: f32,
    /// Degrees between labelled ticks (a minor tick sits halfway)
    pub label_spacing_deg: u16,
    /// Visible ribbon width in pixels
    pub width_px: f32,
}

impl Default for CompassSpec {
    fn default() -> Self {
        Self {
            px_per_degree: 8.0,
            label_spacing_deg: 10,
            width_px: 400.0,
        }
    }
}

impl CompassSpec {
    /// Degrees visible either side of the centre line
    pub fn half_visible_deg(&self) -> f32 {
        self.width_px / 2.0 / self.px_per_degree
    }

    /// Ticks needed to cover the visible window
    pub fn tick_count(&self) -> usize {
        let minor = f32::from(self.label_spacing_deg) / 2.0;
        libm::floorf(2.0 * self.half_visible_deg() / minor) as usize + 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.px_per_degree)?;
        positive(self.width_px)?;
        if self.label_spacing_deg < 2 {
            return Err(ConfigError::NonPositiveLength);
        }
        if self.tick_count() > MAX_COMPASS_TICKS {
            return Err(ConfigError::TooManyTicks);
        }
        Ok(())
    }
}

/// HSI course deviation scale
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DialSpec {
    /// Cross-track error shown at full deflection (NM)
    pub cdi_full_scale_nm: f32,
    /// Bar offset at full deflection (two dots)
    pub cdi_max_offset_px: f32,
}

impl Default for DialSpec {
    fn default() -> Self {
        Self {
            cdi_full_scale_nm: 2.0,
            cdi_max_offset_px: 40.0,
        }
    }
}

/// Odometer wheel geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelSpec {
    /// Vertical distance between adjacent digits on a wheel
    pub digit_height_px: f32,
}

impl Default for WheelSpec {
    fn default() -> Self {
        Self {
            digit_height_px: 30.0,
        }
    }
}

/// Vertical speed bar scale
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VsiSpec {
    /// Bar length covering the first 1000 fpm
    pub one_thousand_px: f32,
    /// Bar length covering each further 1000 fpm
    pub two_thousand_px: f32,
    /// Largest rate shown
    pub max_fpm: f32,
}

impl Default for VsiSpec {
    fn default() -> Self {
        Self {
            one_thousand_px: 120.0,
            two_thousand_px: 40.0,
            max_fpm: 2000.0,
        }
    }
}

/// Spring-damper constants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringConfig {
    /// Spring constant k (1/s²)
    pub stiffness: f32,
    /// Damping coefficient c (1/s)
    pub damping: f32,
}

impl SpringConfig {
    /// Critically damped spring, `c = 2·sqrt(k)`
    pub fn critical(stiffness: f32) -> Self {
        Self {
            stiffness,
            damping: 2.0 * libm::sqrtf(stiffness),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(ConfigError::NonPositiveStiffness);
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(ConfigError::NegativeDamping);
        }
        Ok(())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::critical(8.0)
    }
}

/// Turn rate bar
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnSpec {
    pub px_per_deg_s: f32,
    /// Largest rate shown (deg/s); standard rate is 3
    pub max_rate_deg_s: f32,
    pub spring: SpringConfig,
}

impl Default for TurnSpec {
    fn default() -> Self {
        Self {
            px_per_deg_s: 18.0,
            max_rate_deg_s: 6.0,
            spring: SpringConfig::default(),
        }
    }
}

/// Slip/skid ball
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlipSpec {
    /// Low-pass time constant applied to both accelerations
    pub time_constant_ms: f32,
    /// Deflection at which the ball hits the end of its tube
    pub max_deflection_deg: f32,
    /// Ball travel from centre at full deflection
    pub travel_px: f32,
}

impl Default for SlipSpec {
    fn default() -> Self {
        Self {
            time_constant_ms: 200.0,
            max_deflection_deg: 10.0,
            travel_px: 30.0,
        }
    }
}

/// Clamped integer setting adjusted by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingRange {
    pub initial: i32,
    pub min: i32,
    pub max: i32,
    /// Change per encoder detent
    pub step: i32,
}

impl SettingRange {
    /// Barometric setting in inHg × 100
    pub const fn qnh() -> Self {
        Self {
            initial: 2992,
            min: 2800,
            max: 3100,
            step: 1,
        }
    }

    /// Display brightness in percent
    pub const fn brightness() -> Self {
        Self {
            initial: 100,
            min: 0,
            max: 100,
            step: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.min > self.max || self.initial < self.min || self.initial > self.max {
            return Err(ConfigError::EmptyRange);
        }
        Ok(())
    }
}

/// Heading bug adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadingBugSpec {
    pub initial_deg: u16,
    /// Detents between two edits at which the fast step kicks in
    pub fast_threshold: u16,
    /// Degrees per detent when turning fast
    pub fast_step: u16,
}

impl Default for HeadingBugSpec {
    fn default() -> Self {
        Self {
            initial_deg: 0,
            fast_threshold: 3,
            fast_step: 5,
        }
    }
}

impl HeadingBugSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast_step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.initial_deg >= 360 {
            return Err(ConfigError::EmptyRange);
        }
        Ok(())
    }
}

/// Complete panel configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub altitude_tape: TapeSpec,
    pub airspeed_tape: TapeSpec,
    /// Airspeed arcs (flap range, normal, caution, never exceed)
    pub airspeed_bands: Vec<ColourBand, MAX_COLOUR_BANDS>,
    pub compass: CompassSpec,
    pub dial: DialSpec,
    pub wheel: WheelSpec,
    pub vsi: VsiSpec,
    pub turn: TurnSpec,
    pub slip: SlipSpec,
    pub qnh: SettingRange,
    pub brightness: SettingRange,
    pub heading_bug: HeadingBugSpec,
    /// Snapshot age after which telemetry is treated as missing
    pub link_timeout_ms: u32,
    /// Longest gap between settings reports
    pub report_interval_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let mut airspeed_bands = Vec::new();
        for band in [
            ColourBand::new(35.0, 99.0, BandColour::White),
            ColourBand::new(40.0, 108.0, BandColour::Green),
            ColourBand::new(108.0, 171.0, BandColour::Yellow),
            ColourBand::new(171.0, 300.0, BandColour::Red),
        ] {
            // Capacity is MAX_COLOUR_BANDS
            let _ = airspeed_bands.push(band);
        }

        Self {
            altitude_tape: TapeSpec::altitude(),
            airspeed_tape: TapeSpec::airspeed(),
            airspeed_bands,
            compass: CompassSpec::default(),
            dial: DialSpec::default(),
            wheel: WheelSpec::default(),
            vsi: VsiSpec::default(),
            turn: TurnSpec::default(),
            slip: SlipSpec::default(),
            qnh: SettingRange::qnh(),
            brightness: SettingRange::brightness(),
            heading_bug: HeadingBugSpec::default(),
            link_timeout_ms: 1000,
            report_interval_ms: 1000,
        }
    }
}

impl PanelConfig {
    /// Check every constraint, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.altitude_tape.validate()?;
        self.airspeed_tape.validate()?;
        for band in &self.airspeed_bands {
            if !(band.from.is_finite() && band.to.is_finite()) || band.from > band.to {
                return Err(ConfigError::EmptyRange);
            }
        }
        self.compass.validate()?;
        positive(self.dial.cdi_full_scale_nm)?;
        positive(self.dial.cdi_max_offset_px)?;
        positive(self.wheel.digit_height_px)?;
        positive(self.vsi.one_thousand_px)?;
        positive(self.vsi.two_thousand_px)?;
        positive(self.vsi.max_fpm)?;
        positive(self.turn.px_per_deg_s)?;
        positive(self.turn.max_rate_deg_s)?;
        self.turn.spring.validate()?;
        if !(self.slip.time_constant_ms.is_finite() && self.slip.time_constant_ms > 0.0) {
            return Err(ConfigError::NonPositiveTimeConstant);
        }
        positive(self.slip.max_deflection_deg)?;
        positive(self.slip.travel_px)?;
        self.qnh.validate()?;
        self.brightness.validate()?;
        self.heading_bug.validate()?;
        if self.link_timeout_ms == 0 || self.report_interval_ms == 0 {
            return Err(ConfigError::NonPositiveTimeConstant);
        }
        Ok(())
    }
}

fn positive(value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveLength)
    }
}
