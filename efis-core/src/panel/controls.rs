//! Encoder targets owned by the panel

use crate::input::{Focus, Target};
use crate::settings::{ClampedSetting, ModeCycle, TapeBug, WrappedSetting};

/// Capacity of the panel's encoder arbiter
pub const MAX_CONTROLS: usize = 8;

/// Which setting a control adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlKind {
    Qnh,
    Brightness,
    SpeedMode,
    HeadingBug,
    AltitudeMode,
    AltitudeBug,
}

/// A panel setting registered with the arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Qnh(ClampedSetting),
    Brightness(ClampedSetting),
    SpeedMode(ModeCycle),
    HeadingBug(WrappedSetting),
    AltitudeMode(ModeCycle),
    AltitudeBug(TapeBug),
}

impl Control {
    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Qnh(_) => ControlKind::Qnh,
            Control::Brightness(_) => ControlKind::Brightness,
            Control::SpeedMode(_) => ControlKind::SpeedMode,
            Control::HeadingBug(_) => ControlKind::HeadingBug,
            Control::AltitudeMode(_) => ControlKind::AltitudeMode,
            Control::AltitudeBug(_) => ControlKind::AltitudeBug,
        }
    }

    pub fn focus(&self) -> Focus {
        match self {
            Control::Qnh(s) | Control::Brightness(s) => s.focus(),
            Control::SpeedMode(m) | Control::AltitudeMode(m) => m.focus(),
            Control::HeadingBug(b) => b.focus(),
            Control::AltitudeBug(b) => b.focus(),
        }
    }

    /// Current setting as an integer: value, mode index, or degrees
    pub fn value(&self) -> i32 {
        match self {
            Control::Qnh(s) | Control::Brightness(s) => s.value(),
            Control::SpeedMode(m) | Control::AltitudeMode(m) => i32::from(m.index()),
            Control::HeadingBug(b) => i32::from(b.degrees()),
            Control::AltitudeBug(b) => b.value(),
        }
    }
}

impl Target for Control {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        match self {
            Control::Qnh(s) | Control::Brightness(s) => s.notify(selected, editable, value),
            Control::SpeedMode(m) | Control::AltitudeMode(m) => m.notify(selected, editable, value),
            Control::HeadingBug(b) => b.notify(selected, editable, value),
            Control::AltitudeBug(b) => b.notify(selected, editable, value),
        }
    }
}

/// Value and focus of one control, as shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlView {
    pub kind: ControlKind,
    pub value: i32,
    pub focus: Focus,
}

impl From<&Control> for ControlView {
    fn from(control: &Control) -> Self {
        Self {
            kind: control.kind(),
            value: control.value(),
            focus: control.focus(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingRange;

    #[test]
    fn test_dispatch_reaches_setting() {
        let mut control = Control::Brightness(ClampedSetting::new(SettingRange::brightness()).unwrap());
        control.notify(true, true, -10);
        assert_eq!(control.value(), 80);
        assert_eq!(control.focus(), Focus::Editable);
        assert_eq!(control.kind(), ControlKind::Brightness);
    }

    #[test]
    fn test_view() {
        let control = Control::SpeedMode(ModeCycle::new(2).unwrap());
        let view = ControlView::from(&control);
        assert_eq!(view.kind, ControlKind::SpeedMode);
        assert_eq!(view.value, 0);
        assert_eq!(view.focus, Focus::Normal);
    }
}
