//! Target contract and interaction focus

/// Something the encoder can select and edit
///
/// `notify` is a pure notification: the target updates its own presentation
/// state and returns nothing. `value` is the target's virtual encoder value,
/// continuous across every selection change.
pub trait Target {
    fn notify(&mut self, selected: bool, editable: bool, value: i32);
}

impl<T: Target + ?Sized> Target for &mut T {
    fn notify(&mut self, selected: bool, editable: bool, value: i32) {
        (**self).notify(selected, editable, value)
    }
}

/// Interaction state of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Focus {
    #[default]
    Normal,
    /// Encoder rotation moves the selection to or from this target
    Selected,
    /// Encoder rotation changes this target's value
    Editable,
}

/// Highlight a renderer draws around a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Accent {
    None,
    Selection,
    Editing,
}

impl Accent {
    /// Highlight colour as 0xRRGGBB
    pub fn rgb(self) -> Option<u32> {
        match self {
            Accent::None => None,
            Accent::Selection => Some(0xff_00_00),
            Accent::Editing => Some(0x00_ff_ff),
        }
    }
}

impl Focus {
    pub fn from_flags(selected: bool, editable: bool) -> Self {
        match (selected, editable) {
            (true, true) => Focus::Editable,
            (true, false) => Focus::Selected,
            (false, _) => Focus::Normal,
        }
    }

    pub fn accent(self) -> Accent {
        match self {
            Focus::Normal => Accent::None,
            Focus::Selected => Accent::Selection,
            Focus::Editable => Accent::Editing,
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, Focus::Editable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_from_flags() {
        assert_eq!(Focus::from_flags(true, true), Focus::Editable);
        assert_eq!(Focus::from_flags(true, false), Focus::Selected);
        assert_eq!(Focus::from_flags(false, false), Focus::Normal);
        // Editable without selection is not a thing
        assert_eq!(Focus::from_flags(false, true), Focus::Normal);
    }

    #[test]
    fn test_accent() {
        assert_eq!(Focus::Normal.accent().rgb(), None);
        assert_eq!(Focus::Selected.accent(), Accent::Selection);
        assert_eq!(Focus::Editable.accent().rgb(), Some(0x00ffff));
    }

    struct Counter(u32);

    impl Target for Counter {
        fn notify(&mut self, _selected: bool, _editable: bool, _value: i32) {
            self.0 += 1;
        }
    }

    fn poke<T: Target>(mut target: T) {
        target.notify(true, true, 0);
    }

    #[test]
    fn test_mut_ref_is_target() {
        let mut counter = Counter(0);
        poke(&mut counter);
        poke(&mut counter);
        assert_eq!(counter.0, 2);
    }
}
