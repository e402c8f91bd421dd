//! Encoder arbiter
//!
//! Mode machine for one encoder shared by many targets:
//!
//! ```text
//! Uninitialized --first sample--> Edit <--button release--> Select
//! ```
//!
//! In `Select` rotation walks the selection across targets. In `Edit`
//! rotation changes the active target's virtual value. Each target keeps a
//! stored virtual value, and the hardware position at the last mode change
//! (the anchor) is subtracted out so travel while a target was inactive
//! never shows up in its value.

use heapless::Vec;

use crate::config::ConfigError;

use super::Target;

/// One encoder reading, taken every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderSample {
    /// Absolute detent count since power-on
    pub position: i32,
    /// Push button held down
    pub pressed: bool,
}

impl EncoderSample {
    pub const fn new(position: i32, pressed: bool) -> Self {
        Self { position, pressed }
    }
}

/// Arbiter modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No sample seen yet
    Uninitialized,
    /// Rotation moves the selection
    Select,
    /// Rotation edits the selected target
    Edit,
}

/// Inputs that change the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    /// First encoder sample establishes the baseline
    FirstSample,
    /// Button went from pressed to released
    ButtonReleased,
}

impl Mode {
    pub fn transition(self, event: ModeEvent) -> Self {
        use Mode::*;
        use ModeEvent::*;

        match (self, event) {
            // The first target is already editable when registered
            (Uninitialized, FirstSample) => Edit,
            (Select, ButtonReleased) => Edit,
            (Edit, ButtonReleased) => Select,
            _ => self,
        }
    }
}

#[derive(Debug)]
struct Slot<T> {
    target: T,
    stored: i32,
}

/// Arbitrates one encoder across up to `N` targets
#[derive(Debug)]
pub struct EncoderArbiter<T: Target, const N: usize> {
    slots: Vec<Slot<T>, N>,
    mode: Mode,
    current: usize,
    /// Hardware position at the last mode change
    anchor: i32,
    /// Offset added to the position while selecting
    selection_anchor: i32,
    last: EncoderSample,
}

impl<T: Target, const N: usize> Default for EncoderArbiter<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target, const N: usize> EncoderArbiter<T, N> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            mode: Mode::Uninitialized,
            current: 0,
            anchor: 0,
            selection_anchor: 0,
            last: EncoderSample::new(0, false),
        }
    }

    /// Append a target with virtual value 0
    ///
    /// The first target is selected and editable right away. Registration
    /// closes once the first encoder sample has been taken.
    pub fn register(&mut self, target: T) -> Result<usize, ConfigError> {
        if self.mode != Mode::Uninitialized {
            return Err(ConfigError::RegistrationClosed);
        }
        self.slots
            .push(Slot { target, stored: 0 })
            .map_err(|_| ConfigError::TooManyTargets)?;
        let index = self.slots.len() - 1;
        if index == 0 {
            self.slots[0].target.notify(true, true, 0);
        }
        Ok(index)
    }

    /// Process one encoder sample
    ///
    /// Only changes matter: a position delta, or a button release edge.
    /// With no targets registered every sample is ignored.
    pub fn sample(&mut self, sample: EncoderSample) {
        if self.slots.is_empty() {
            return;
        }

        if self.mode == Mode::Uninitialized {
            self.anchor = sample.position;
            self.last = sample;
            self.mode = self.mode.transition(ModeEvent::FirstSample);
            return;
        }

        if sample.position != self.last.position {
            self.rotated(sample.position);
        }
        if self.last.pressed && !sample.pressed {
            self.released(sample.position);
        }
        self.last = sample;
    }

    fn rotated(&mut self, position: i32) {
        match self.mode {
            Mode::Select => {
                let count = self.slots.len() as i32;
                let index = position
                    .wrapping_add(self.selection_anchor)
                    .wrapping_sub(self.anchor)
                    .rem_euclid(count) as usize;
                if index != self.current {
                    let old = &mut self.slots[self.current];
                    old.target.notify(false, false, old.stored);
                    self.current = index;
                    let new = &mut self.slots[index];
                    new.target.notify(true, false, new.stored);
                }
            }
            Mode::Edit => {
                let effective = self.effective(position);
                self.slots[self.current].target.notify(true, true, effective);
            }
            Mode::Uninitialized => {}
        }
    }

    /// Toggle mode on a button release
    ///
    /// Entering `Select` seeds the selection anchor with the departing
    /// target's stored value, not its index. After editing a target to `s`
    /// the next detent therefore lands on `(s ± 1) mod n`, which need not be
    /// a neighbour. This keeps selection a pure function of the encoder
    /// position and the stored values.
    fn released(&mut self, position: i32) {
        let next = self.mode.transition(ModeEvent::ButtonReleased);
        match next {
            Mode::Select => {
                let stored = self.effective(position);
                let slot = &mut self.slots[self.current];
                slot.stored = stored;
                self.selection_anchor = stored;
                slot.target.notify(true, false, stored);
            }
            Mode::Edit => {
                let slot = &mut self.slots[self.current];
                slot.target.notify(true, true, slot.stored);
            }
            Mode::Uninitialized => {}
        }
        self.anchor = position;
        self.mode = next;
    }

    /// Virtual value of the active target at `position` while editing
    fn effective(&self, position: i32) -> i32 {
        position
            .wrapping_add(self.slots[self.current].stored)
            .wrapping_sub(self.anchor)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the selected target
    pub fn selected(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn target(&self, index: usize) -> Option<&T> {
        self.slots.get(index).map(|slot| &slot.target)
    }

    /// Virtual value persisted for `index` at its last exit from editing
    pub fn stored_value(&self, index: usize) -> Option<i32> {
        self.slots.get(index).map(|slot| slot.stored)
    }

    pub fn targets(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map(|slot| &slot.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<(bool, bool, i32), 16>;

    #[derive(Debug, Default)]
    struct Recorder {
        log: Log,
    }

    impl Target for Recorder {
        fn notify(&mut self, selected: bool, editable: bool, value: i32) {
            let _ = self.log.push((selected, editable, value));
        }
    }

    impl Recorder {
        fn last(&self) -> Option<(bool, bool, i32)> {
            self.log.last().copied()
        }
    }

    fn arbiter(count: usize) -> EncoderArbiter<Recorder, 4> {
        let mut arbiter = EncoderArbiter::new();
        for _ in 0..count {
            arbiter.register(Recorder::default()).unwrap();
        }
        arbiter
    }

    fn click(arbiter: &mut EncoderArbiter<Recorder, 4>, position: i32) {
        arbiter.sample(EncoderSample::new(position, true));
        arbiter.sample(EncoderSample::new(position, false));
    }

    fn log(arbiter: &EncoderArbiter<Recorder, 4>, index: usize) -> &[(bool, bool, i32)] {
        &arbiter.target(index).unwrap().log
    }

    #[test]
    fn test_mode_transitions() {
        assert_eq!(Mode::Uninitialized.transition(ModeEvent::FirstSample), Mode::Edit);
        assert_eq!(
            Mode::Uninitialized.transition(ModeEvent::ButtonReleased),
            Mode::Uninitialized
        );
        assert_eq!(Mode::Edit.transition(ModeEvent::ButtonReleased), Mode::Select);
        assert_eq!(Mode::Select.transition(ModeEvent::ButtonReleased), Mode::Edit);
        assert_eq!(Mode::Select.transition(ModeEvent::FirstSample), Mode::Select);
    }

    #[test]
    fn test_selection_resumes_from_stored_value() {
        let mut arbiter = arbiter(3);
        arbiter.sample(EncoderSample::new(0, false));
        arbiter.sample(EncoderSample::new(4, false));
        click(&mut arbiter, 4);
        assert_eq!(arbiter.stored_value(0), Some(4));
        // (5 + 4 - 4) mod 3: one detent skips target 1
        arbiter.sample(EncoderSample::new(5, false));
        assert_eq!(arbiter.selected(), 2);
        assert_eq!(log(&arbiter, 2).last(), Some(&(true, false, 0)));
        assert!(log(&arbiter, 1).is_empty());
    }

    #[test]
    fn test_first_target_auto_selected() {
        let arbiter = arbiter(2);
        assert_eq!(log(&arbiter, 0), &[(true, true, 0)]);
        assert!(log(&arbiter, 1).is_empty());
        assert_eq!(arbiter.selected(), 0);
    }

    #[test]
    fn test_first_sample_is_baseline_only() {
        let mut arbiter = arbiter(1);
        arbiter.sample(EncoderSample::new(250, false));
        assert_eq!(arbiter.mode(), Mode::Edit);
        assert_eq!(log(&arbiter, 0).len(), 1);
        // Edits are relative to the baseline
        arbiter.sample(EncoderSample::new(253, false));
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, true, 3)));
    }

    #[test]
    fn test_no_targets_ignores_input() {
        let mut arbiter: EncoderArbiter<Recorder, 4> = EncoderArbiter::new();
        arbiter.sample(EncoderSample::new(5, false));
        click(&mut arbiter, 9);
        assert_eq!(arbiter.mode(), Mode::Uninitialized);
        assert!(arbiter.is_empty());
        // Still open for registration
        assert_eq!(arbiter.register(Recorder::default()), Ok(0));
    }

    #[test]
    fn test_registration_closes_after_first_sample() {
        let mut arbiter = arbiter(1);
        arbiter.sample(EncoderSample::new(0, false));
        assert_eq!(
            arbiter.register(Recorder::default()),
            Err(ConfigError::RegistrationClosed)
        );
    }

    #[test]
    fn test_capacity() {
        let mut arbiter = arbiter(4);
        assert_eq!(
            arbiter.register(Recorder::default()),
            Err(ConfigError::TooManyTargets)
        );
        assert_eq!(arbiter.len(), 4);
    }

    #[test]
    fn test_button_acts_on_release() {
        let mut arbiter = arbiter(2);
        arbiter.sample(EncoderSample::new(0, false));
        arbiter.sample(EncoderSample::new(0, true));
        assert_eq!(arbiter.mode(), Mode::Edit);
        arbiter.sample(EncoderSample::new(0, true));
        assert_eq!(arbiter.mode(), Mode::Edit);
        arbiter.sample(EncoderSample::new(0, false));
        assert_eq!(arbiter.mode(), Mode::Select);
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, false, 0)));
    }

    #[test]
    fn test_select_does_not_touch_stored_values() {
        let mut arbiter = arbiter(3);
        arbiter.sample(EncoderSample::new(0, false));
        arbiter.sample(EncoderSample::new(5, false));
        click(&mut arbiter, 5);
        assert_eq!(arbiter.stored_value(0), Some(5));

        for position in [6, 7, 8, 2, -4, 11] {
            arbiter.sample(EncoderSample::new(position, false));
        }
        assert_eq!(arbiter.stored_value(0), Some(5));
        assert_eq!(arbiter.stored_value(1), Some(0));
        assert_eq!(arbiter.stored_value(2), Some(0));
    }

    #[test]
    fn test_selection_wraps_backwards() {
        let mut arbiter = arbiter(3);
        arbiter.sample(EncoderSample::new(0, false));
        click(&mut arbiter, 0);
        arbiter.sample(EncoderSample::new(-1, false));
        assert_eq!(arbiter.selected(), 2);
        assert_eq!(log(&arbiter, 0).last(), Some(&(false, false, 0)));
        assert_eq!(log(&arbiter, 2), &[(true, false, 0)]);
    }

    #[test]
    fn test_edit_resumes_without_jump() {
        let mut arbiter = arbiter(2);
        arbiter.sample(EncoderSample::new(0, false));
        arbiter.sample(EncoderSample::new(7, false));
        click(&mut arbiter, 7);
        // Selection index is (position + 7 - 7) mod 2
        arbiter.sample(EncoderSample::new(9, false));
        assert_eq!(arbiter.selected(), 1);
        // Spin a long way and come back to target 0
        for position in [40, 41, 42] {
            arbiter.sample(EncoderSample::new(position, false));
        }
        assert_eq!(arbiter.selected(), 0);
        click(&mut arbiter, 42);
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, true, 7)));
        arbiter.sample(EncoderSample::new(43, false));
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, true, 8)));
    }

    #[test]
    fn test_rotation_in_edit_notifies_active_only() {
        let mut arbiter = arbiter(2);
        arbiter.sample(EncoderSample::new(0, false));
        arbiter.sample(EncoderSample::new(-3, false));
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, true, -3)));
        assert!(log(&arbiter, 1).is_empty());
        // Not persisted until the next exit from editing
        assert_eq!(arbiter.stored_value(0), Some(0));
    }

    #[test]
    fn test_extreme_positions_wrap() {
        let mut arbiter = arbiter(2);
        arbiter.sample(EncoderSample::new(i32::MAX, false));
        arbiter.sample(EncoderSample::new(i32::MIN, false));
        assert_eq!(arbiter.target(0).unwrap().last(), Some((true, true, 1)));
    }
}
