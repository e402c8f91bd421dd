//! Clamped absolute setting (barometric setting, brightness)

use crate::config::{ConfigError, SettingRange};
use crate::input::{Focus, Target};

/// `origin + value × step`, held inside `[min, max]`
///
/// When a limit engages the origin moves with the encoder, so turning back
/// responds on the very next detent instead of after unwinding the overrun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClampedSetting {
    range: SettingRange,
    origin: i32,
    value: i32,
    focus: Focus,
}

impl ClampedSetting {
    pub fn new(range: SettingRange) -> Result<Self, ConfigError> {
        range.validate()?;
        Ok(Self {
            range,
            origin: range.initial,
            value: range.initial,
            focus: Focus::Normal,
        })
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn range(&self) -> &SettingRange {
        &self.range
    }

    fn apply(&mut self, virtual_value: i32) {
        let offset = virtual_value.saturating_mul(self.range.step);
        let raw = self.origin.saturating_add(offset);
        if raw > self.range.max {
            self.origin = self.range.max.saturating_sub(offset);
            self.value = self.range.max;
        } else if raw < self.range.min {
            self.origin = self.range.min.saturating_sub(offset);
            self.value = self.range.min;
        } else {
            self.value = raw;
        }
    }
}

impl Target for ClampedSetting {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        self.focus = Focus::from_flags(selected, editable);
        if self.focus.is_editable() {
            self.apply(value);
        }
    }
}
