//! Heading bug: wraps at 360 with an acceleration step

use crate::config::{ConfigError, HeadingBugSpec};
use crate::input::{Focus, Target};

/// Degrees wrapped into `[0, 360)`
///
/// Each edit moves by the change in virtual value since the previous edit,
/// one degree per detent, or `fast_step` degrees per detent when the encoder
/// jumped at least `fast_threshold` detents between two edits. The first
/// value after entering edit mode only sets the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrappedSetting {
    spec: HeadingBugSpec,
    degrees: u16,
    last_value: Option<i32>,
    focus: Focus,
}

impl WrappedSetting {
    pub fn new(spec: HeadingBugSpec) -> Result<Self, ConfigError> {
        spec.validate()?;
        Ok(Self {
            spec,
            degrees: spec.initial_deg,
            last_value: None,
            focus: Focus::Normal,
        })
    }

    pub fn degrees(&self) -> u16 {
        self.degrees
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn apply(&mut self, value: i32) {
        if let Some(last) = self.last_value {
            let delta = i64::from(value) - i64::from(last);
            let step = if delta.unsigned_abs() >= u64::from(self.spec.fast_threshold.max(1)) {
                i64::from(self.spec.fast_step)
            } else {
                1
            };
            let moved = i64::from(self.degrees) + delta * step;
            self.degrees = moved.rem_euclid(360) as u16;
        }
        self.last_value = Some(value);
    }
}

impl Target for WrappedSetting {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        self.focus = Focus::from_flags(selected, editable);
        if self.focus.is_editable() {
            self.apply(value);
        } else {
            self.last_value = None;
        }
    }
}
