//! Display mode selector

use crate::config::ConfigError;
use crate::input::{Focus, Target};

/// Picks one of `count` modes as `value mod count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeCycle {
    count: u8,
    index: u8,
    focus: Focus,
}

impl ModeCycle {
    pub fn new(count: u8) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroModeCount);
        }
        Ok(Self {
            count,
            index: 0,
            focus: Focus::Normal,
        })
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}

impl Target for ModeCycle {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        self.focus = Focus::from_flags(selected, editable);
        if self.focus.is_editable() {
            self.index = value.rem_euclid(i32::from(self.count)) as u8;
        }
    }
}

/// Speed readout source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedMode {
    GroundSpeed,
    TrueAirspeed,
}

impl SpeedMode {
    pub const COUNT: u8 = 2;

    pub fn from_index(index: u8) -> Self {
        match index % Self::COUNT {
            0 => SpeedMode::GroundSpeed,
            _ => SpeedMode::TrueAirspeed,
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            SpeedMode::GroundSpeed => "GS",
            SpeedMode::TrueAirspeed => "TAS",
        }
    }
}

/// Altitude readout source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltitudeMode {
    Gps,
    Pressure,
    Density,
}

impl AltitudeMode {
    pub const COUNT: u8 = 3;

    pub fn from_index(index: u8) -> Self {
        match index % Self::COUNT {
            0 => AltitudeMode::Gps,
            1 => AltitudeMode::Pressure,
            _ => AltitudeMode::Density,
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            AltitudeMode::Gps => "GPS",
            AltitudeMode::Pressure => "PRE",
            AltitudeMode::Density => "DEN",
        }
    }
}
