//! Panel orchestrator
//!
//! [`Panel`] is the single context object: it owns the current snapshot,
//! every mapper and filter, the encoder arbiter with its controls, and the
//! report limiter. The firmware calls [`Panel::receive`] when a snapshot
//! arrives and [`Panel::tick`] once per update period.

pub mod controls;
pub mod frame;

pub use controls::*;
pub use frame::*;

use core::fmt::Write;

use heapless::{String, Vec};

use crate::air;
use crate::config::{ConfigError, PanelConfig, MAX_COLOUR_BANDS};
use crate::filter::{SlipBall, SpringDamper};
use crate::input::{EncoderArbiter, EncoderSample, Focus};
use crate::mapping::{
    BandExtent, CompassWrapMapper, DialInput, DialMapper, Redraw, TapeMapper, TurnBarMapper,
    VsiMapper, WheelDigit, WheelDigitMapper, WheelFrame,
};
use crate::report::{ReportLimiter, SettingsReport};
use crate::settings::{AltitudeMode, ClampedSetting, ModeCycle, SpeedMode, TapeBug, WrappedSetting};
use crate::telemetry::{LinkMonitor, LinkStatus, Snapshot};

/// Altitude drum: tens wheel shows a fixed 0 ones digit, sign on the top wheel
const ALTITUDE_DIGITS: [WheelDigit; ALTITUDE_WHEELS] = [
    WheelDigit::new(1, true),
    WheelDigit::new(2, true),
    WheelDigit::new(3, true),
    WheelDigit::new(4, true).with_sign(),
];

const AIRSPEED_DIGITS: [WheelDigit; AIRSPEED_WHEELS] = [
    WheelDigit::new(0, false),
    WheelDigit::new(1, false),
    WheelDigit::new(2, false),
];

/// Complete instrument panel state
pub struct Panel {
    config: PanelConfig,
    snapshot: Snapshot,
    link: LinkMonitor,
    /// Last time the link was aged (tick or receipt)
    link_clock_ms: Option<u32>,
    /// Link status reported in the previous frame
    last_link: LinkStatus,
    arbiter: EncoderArbiter<Control, MAX_CONTROLS>,
    altitude_tape: TapeMapper,
    altitude_wheels: [WheelDigitMapper; ALTITUDE_WHEELS],
    airspeed_tape: TapeMapper,
    airspeed_wheels: [WheelDigitMapper; AIRSPEED_WHEELS],
    heading: CompassWrapMapper,
    hsi: DialMapper,
    vsi: VsiMapper,
    turn_needle: SpringDamper,
    turn: TurnBarMapper,
    slip: SlipBall,
    limiter: ReportLimiter,
    last_controls: Vec<ControlView, MAX_CONTROLS>,
    /// Text readouts and overlays drawn last tick
    last_overlay: Option<Overlay>,
}

impl Panel {
    /// Validate `config`, build every instrument and register the controls
    ///
    /// Controls are registered in a fixed order: barometric setting,
    /// brightness, speed mode, heading bug, altitude mode, altitude bug (only
    /// when the altitude tape has a bug). The barometric setting starts
    /// selected and editable.
    pub fn new(config: PanelConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let unit_px = config.wheel.digit_height_px;
        let altitude_wheels = WheelDigitMapper::drum(ALTITUDE_DIGITS, unit_px)?;
        let airspeed_wheels = WheelDigitMapper::drum(AIRSPEED_DIGITS, unit_px)?;

        let mut arbiter = EncoderArbiter::new();
        arbiter.register(Control::Qnh(ClampedSetting::new(config.qnh)?))?;
        arbiter.register(Control::Brightness(ClampedSetting::new(config.brightness)?))?;
        arbiter.register(Control::SpeedMode(ModeCycle::new(SpeedMode::COUNT)?))?;
        arbiter.register(Control::HeadingBug(WrappedSetting::new(config.heading_bug)?))?;
        arbiter.register(Control::AltitudeMode(ModeCycle::new(AltitudeMode::COUNT)?))?;
        if let Some(step) = config.altitude_tape.bug_step {
            arbiter.register(Control::AltitudeBug(TapeBug::new(step)?))?;
        }

        Ok(Self {
            snapshot: Snapshot::empty(),
            link: LinkMonitor::new(config.link_timeout_ms),
            link_clock_ms: None,
            last_link: LinkStatus::Waiting,
            altitude_tape: TapeMapper::new(config.altitude_tape)?,
            altitude_wheels,
            airspeed_tape: TapeMapper::new(config.airspeed_tape)?,
            airspeed_wheels,
            heading: CompassWrapMapper::new(config.compass)?,
            hsi: DialMapper::new(config.dial)?,
            vsi: VsiMapper::new(config.vsi)?,
            turn_needle: SpringDamper::new(config.turn.spring)?,
            turn: TurnBarMapper::new(config.turn)?,
            slip: SlipBall::new(config.slip)?,
            limiter: ReportLimiter::new(config.report_interval_ms),
            last_controls: Vec::new(),
            last_overlay: None,
            arbiter,
            config,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Replace the current snapshot wholesale
    pub fn receive(&mut self, snapshot: Snapshot, now_ms: u32) {
        self.snapshot = snapshot;
        self.link.snapshot_received();
        self.link_clock_ms = Some(now_ms);
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link.status()
    }

    pub fn control(&self, kind: ControlKind) -> Option<&Control> {
        self.arbiter.targets().find(|c| c.kind() == kind)
    }

    pub fn arbiter(&self) -> &EncoderArbiter<Control, MAX_CONTROLS> {
        &self.arbiter
    }

    fn control_value(&self, kind: ControlKind) -> Option<i32> {
        self.control(kind).map(Control::value)
    }

    fn control_focus(&self, kind: ControlKind) -> Focus {
        self.control(kind).map_or(Focus::Normal, Control::focus)
    }

    /// Current settings report contents
    pub fn settings(&self) -> SettingsReport {
        let brightness = self.control_value(ControlKind::Brightness).unwrap_or(0);
        SettingsReport {
            qnh_inhg_x100: self.control_value(ControlKind::Qnh).unwrap_or(0),
            brightness_pct: brightness.clamp(0, i32::from(u8::MAX)) as u8,
        }
    }

    /// One update period
    ///
    /// Ages the link, applies the encoder sample, then recomputes every
    /// instrument from the snapshot (or from no data if the link is not
    /// live). Bad input degrades single instruments; it never aborts a tick.
    pub fn tick(&mut self, sample: Option<EncoderSample>, now_ms: u32) -> PanelFrame {
        let delta_ms = self.link_clock_ms.map_or(0, |last| now_ms.wrapping_sub(last));
        self.link_clock_ms = Some(now_ms);
        self.link.update_time(delta_ms);
        let link = self.link.status();
        let link_changed = link != self.last_link;
        self.last_link = link;

        let snap = if link == LinkStatus::Live {
            self.snapshot
        } else {
            Snapshot::empty()
        };

        if let Some(sample) = sample {
            self.arbiter.sample(sample);
        }

        let altitude_bug = self.control_value(ControlKind::AltitudeBug).map(|v| v as f32);
        let heading_bug = self.control_value(ControlKind::HeadingBug).map(|v| v as f32);

        let altitude_tape = View {
            redraw: self.altitude_tape.update(snap.altitude_ft, altitude_bug),
            valid: self.altitude_tape.is_valid(),
            frame: self.altitude_tape.frame().clone(),
        };
        let altitude_wheels = drum(&mut self.altitude_wheels, snap.altitude_ft);

        let airspeed_tape = View {
            redraw: self.airspeed_tape.update(snap.airspeed_kt, None),
            valid: self.airspeed_tape.is_valid(),
            frame: self.airspeed_tape.frame().clone(),
        };
        let airspeed_wheels = drum(&mut self.airspeed_wheels, snap.airspeed_kt);
        let mut airspeed_bands = Vec::new();
        if let Some(speed) = snap.airspeed_kt.filter(|v| v.is_finite()) {
            for band in &self.config.airspeed_bands {
                if let Some(extent) = self.airspeed_tape.band_extent(band, speed) {
                    let _ = airspeed_bands.push(extent);
                }
            }
        }

        let heading = View {
            redraw: self.heading.update(snap.yaw_deg, heading_bug),
            valid: self.heading.is_valid(),
            frame: self.heading.frame().clone(),
        };
        let dial_input = DialInput {
            heading: snap.yaw_deg,
            bug: heading_bug,
            ground_track: snap.gps_track_deg,
            desired_track: snap.desired_track_deg,
            cross_track_nm: snap.cross_track_nm,
            to_from: snap.to_from,
        };
        let hsi = View {
            redraw: self.hsi.update(&dial_input),
            valid: self.hsi.is_valid(),
            frame: *self.hsi.frame(),
        };

        let vsi = View {
            redraw: self.vsi.update(snap.vertical_speed_fpm),
            valid: self.vsi.is_valid(),
            frame: self.vsi.current_px(),
        };

        let rate = match snap.turn_rate_deg_s {
            Some(rate) => Some(self.turn_needle.update(rate, now_ms)),
            None => {
                self.turn_needle.reset();
                None
            }
        };
        let turn = View {
            redraw: self.turn.update(rate),
            valid: self.turn.is_valid(),
            frame: self.turn.current_px(),
        };

        let slip = View {
            redraw: self
                .slip
                .update(snap.lateral_accel, snap.vertical_accel, now_ms),
            valid: self.slip.is_valid(),
            frame: self.slip.offset_px(),
        };

        let controls: Vec<ControlView, MAX_CONTROLS> =
            self.arbiter.targets().map(ControlView::from).collect();
        let controls_redraw = Redraw::from(controls != self.last_controls);
        self.last_controls = controls.clone();
        let settings = self.settings();
        let report = self.limiter.poll(settings, now_ms);

        let overlay = Overlay {
            attitude: attitude(&snap),
            speed_readout: self.speed_readout(&snap),
            altitude_readout: self.altitude_readout(&snap),
            clock: clock(&snap),
            airspeed_bands,
        };
        let overlay_redraw = Redraw::from(self.last_overlay.as_ref() != Some(&overlay));
        self.last_overlay = Some(overlay.clone());

        PanelFrame {
            link,
            link_changed,
            attitude: overlay.attitude,
            altitude_tape,
            altitude_wheels,
            airspeed_tape,
            airspeed_wheels,
            airspeed_bands: overlay.airspeed_bands,
            heading,
            hsi,
            vsi,
            turn,
            turn_standard_rate_px: self.turn.standard_rate_px(),
            slip,
            speed_readout: overlay.speed_readout,
            altitude_readout: overlay.altitude_readout,
            clock: overlay.clock,
            overlay_redraw,
            controls,
            controls_redraw,
            report,
        }
    }

    fn speed_readout(&self, snap: &Snapshot) -> ModeReadout {
        let index = self.control_value(ControlKind::SpeedMode).unwrap_or(0);
        let mode = SpeedMode::from_index(index as u8);
        let value = match mode {
            SpeedMode::GroundSpeed => snap.gps_speed_kt.filter(|v| v.is_finite()),
            SpeedMode::TrueAirspeed => match (
                snap.static_pressure_hpa,
                snap.differential_pressure_hpa,
                snap.temperature_c,
            ) {
                (Some(ps), Some(qc), Some(t)) => air::true_airspeed_kt(ps, qc, t),
                _ => None,
            },
        };
        ModeReadout {
            legend: mode.legend(),
            value: value.map(|v| libm::roundf(v) as i32),
            focus: self.control_focus(ControlKind::SpeedMode),
        }
    }

    fn altitude_readout(&self, snap: &Snapshot) -> ModeReadout {
        let index = self.control_value(ControlKind::AltitudeMode).unwrap_or(0);
        let mode = AltitudeMode::from_index(index as u8);
        let pressure_altitude = snap.static_pressure_hpa.and_then(air::pressure_altitude_ft);
        let value = match mode {
            AltitudeMode::Gps => snap.gps_altitude_ft.filter(|v| v.is_finite()),
            AltitudeMode::Pressure => pressure_altitude,
            AltitudeMode::Density => match (pressure_altitude, snap.temperature_c) {
                (Some(pa), Some(t)) => air::density_altitude_ft(pa, t),
                _ => None,
            },
        };
        ModeReadout {
            legend: mode.legend(),
            value: value.map(|v| libm::roundf(v) as i32),
            focus: self.control_focus(ControlKind::AltitudeMode),
        }
    }
}

/// Values drawn without a mapper of their own
#[derive(Debug, Clone, PartialEq)]
struct Overlay {
    attitude: Option<Attitude>,
    speed_readout: ModeReadout,
    altitude_readout: ModeReadout,
    clock: Option<String<5>>,
    airspeed_bands: Vec<BandExtent, MAX_COLOUR_BANDS>,
}

fn drum<const N: usize>(
    wheels: &mut [WheelDigitMapper; N],
    value: Option<f32>,
) -> Vec<View<WheelFrame>, N> {
    let mut views = Vec::new();
    for wheel in wheels.iter_mut() {
        let view = View {
            redraw: wheel.update(value),
            valid: wheel.is_valid(),
            frame: wheel.frame().clone(),
        };
        if views.push(view).is_err() {
            break;
        }
    }
    views
}

fn attitude(snap: &Snapshot) -> Option<Attitude> {
    let pitch_deg = snap.pitch_deg.filter(|v| v.is_finite())?;
    let roll_deg = snap.roll_deg.filter(|v| v.is_finite())?;
    Some(Attitude {
        pitch_deg,
        roll_deg,
    })
}

fn clock(snap: &Snapshot) -> Option<String<5>> {
    let hour = snap.hour.filter(|h| *h < 24)?;
    let minute = snap.minute.filter(|m| *m < 60)?;
    let mut text = String::new();
    write!(text, "{:02}:{:02}", hour, minute).ok()?;
    Some(text)
}
