//! Value-to-position mapping
//!
//! Each mapper turns a raw scalar into the offsets, labels and digits an
//! instrument widget draws. Mappers hold their last frame and report through
//! [`Redraw`] whether anything observable changed.

pub mod compass;
pub mod indicator;
pub mod tape;
pub mod wheel;

pub use compass::*;
pub use indicator::*;
pub use tape::*;
pub use wheel::*;

/// Outcome of feeding a new input to a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    /// Nothing observable changed
    #[default]
    Skip,
    /// Frame or validity changed
    Needed,
}

impl Redraw {
    pub fn is_needed(self) -> bool {
        matches!(self, Self::Needed)
    }

    /// Combine two outcomes; a redraw is needed if either needs one
    pub fn or(self, other: Self) -> Self {
        if self.is_needed() || other.is_needed() {
            Self::Needed
        } else {
            Self::Skip
        }
    }
}

impl From<bool> for Redraw {
    fn from(changed: bool) -> Self {
        if changed {
            Self::Needed
        } else {
            Self::Skip
        }
    }
}

/// Last input seen by a mapper and whether it was usable
///
/// `None` input, or a non-finite number, flips the widget to invalid. The
/// last frame is kept so the renderer can draw it under an invalid-data flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Freshness<K> {
    last: Option<K>,
    valid: bool,
}

impl<K: PartialEq + Copy> Freshness<K> {
    pub(crate) const fn new() -> Self {
        Self {
            last: None,
            valid: false,
        }
    }

    /// Record `key`; returns `true` when it differs from the last valid key
    pub(crate) fn accept(&mut self, key: K) -> bool {
        let changed = !self.valid || self.last != Some(key);
        self.last = Some(key);
        self.valid = true;
        changed
    }

    /// Mark invalid; returns `true` only on the valid → invalid edge
    pub(crate) fn invalidate(&mut self) -> bool {
        let was_valid = self.valid;
        self.valid = false;
        was_valid
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Filter out non-finite readings
pub(crate) fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}
