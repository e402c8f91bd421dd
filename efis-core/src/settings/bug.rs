//! Tape bug with a ratcheting zero reference

use crate::config::ConfigError;
use crate::input::{Focus, Target};

/// Bug value `(value − reference) × step`
///
/// The reference only ever moves down, to the lowest virtual value seen, so
/// the bug never goes negative and turning back up from the floor responds
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapeBug {
    step: i32,
    reference: i32,
    value: i32,
    focus: Focus,
}

impl TapeBug {
    pub fn new(step: u16) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        Ok(Self {
            step: i32::from(step),
            reference: 0,
            value: 0,
            focus: Focus::Normal,
        })
    }

    /// Bug setting in tape units
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Lowest virtual value seen
    pub fn reference(&self) -> i32 {
        self.reference
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}

impl Target for TapeBug {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        self.focus = Focus::from_flags(selected, editable);
        if self.focus.is_editable() {
            self.reference = self.reference.min(value);
            self.value = value.saturating_sub(self.reference).saturating_mul(self.step);
        }
    }
}
