//! Per-tick panel output

use heapless::{String, Vec};

use crate::config::MAX_COLOUR_BANDS;
use crate::input::Focus;
use crate::mapping::{BandExtent, CompassFrame, DialFrame, Redraw, TapeFrame, WheelFrame};
use crate::report::SettingsReport;
use crate::telemetry::LinkStatus;

use super::controls::{ControlView, MAX_CONTROLS};

/// Wheels in the altitude drum (tens through ten-thousands)
pub const ALTITUDE_WHEELS: usize = 4;

/// Wheels in the airspeed drum (ones through hundreds)
pub const AIRSPEED_WHEELS: usize = 3;

/// One instrument's state for this tick
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct View<T> {
    /// Last computed frame; kept while invalid
    pub frame: T,
    /// False when the input is missing: draw the invalid-data flag
    pub valid: bool,
    pub redraw: Redraw,
}

/// Attitude passthrough
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attitude {
    pub pitch_deg: f32,
    pub roll_deg: f32,
}

/// A value shown in a box with a mode legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeReadout {
    pub legend: &'static str,
    /// `None` when the selected source has no data
    pub value: Option<i32>,
    pub focus: Focus,
}

/// Everything a renderer needs for one tick
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelFrame {
    pub link: LinkStatus,
    /// Set on the tick the link status changed
    pub link_changed: bool,
    pub attitude: Option<Attitude>,
    pub altitude_tape: View<TapeFrame>,
    pub altitude_wheels: Vec<View<WheelFrame>, ALTITUDE_WHEELS>,
    pub airspeed_tape: View<TapeFrame>,
    pub airspeed_wheels: Vec<View<WheelFrame>, AIRSPEED_WHEELS>,
    /// Visible airspeed arcs
    pub airspeed_bands: Vec<BandExtent, MAX_COLOUR_BANDS>,
    pub heading: View<CompassFrame>,
    pub hsi: View<DialFrame>,
    /// Vertical speed bar length, positive up
    pub vsi: View<f32>,
    /// Turn rate bar width, `None` when under a pixel
    pub turn: View<Option<f32>>,
    /// Offset of the standard rate marks either side of centre
    pub turn_standard_rate_px: f32,
    /// Slip ball offset
    pub slip: View<f32>,
    pub speed_readout: ModeReadout,
    pub altitude_readout: ModeReadout,
    /// UTC clock, `"HH:MM"`
    pub clock: Option<String<5>>,
    /// Attitude, readouts, clock or airspeed arcs changed
    pub overlay_redraw: Redraw,
    pub controls: Vec<ControlView, MAX_CONTROLS>,
    pub controls_redraw: Redraw,
    /// Report to send to the sensor source this tick
    pub report: Option<SettingsReport>,
}

impl PanelFrame {
    /// Anything visible changed since the previous frame
    pub fn needs_redraw(&self) -> bool {
        self.link_changed
            || self.overlay_redraw.is_needed()
            || self.altitude_tape.redraw.is_needed()
            || self.altitude_wheels.iter().any(|w| w.redraw.is_needed())
            || self.airspeed_tape.redraw.is_needed()
            || self.airspeed_wheels.iter().any(|w| w.redraw.is_needed())
            || self.heading.redraw.is_needed()
            || self.hsi.redraw.is_needed()
            || self.vsi.redraw.is_needed()
            || self.turn.redraw.is_needed()
            || self.slip.redraw.is_needed()
            || self.controls_redraw.is_needed()
    }
}
