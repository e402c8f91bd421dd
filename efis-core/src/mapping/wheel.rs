//! Odometer-style rotating digit wheels
//!
//! A wheel shows one decimal place of a value. While the next lower place
//! runs through its last unit before a carry the wheel rolls smoothly to the
//! next digit. Slot offsets are relative to the wheel window's centre,
//! positive downwards.

use heapless::Vec;

use crate::config::ConfigError;

use super::{finite, Freshness, Redraw};

/// Digit slots on a wheel
pub const WHEEL_SLOTS: usize = 10;

/// Slots start this many places below the current digit
const FIRST_SLOT: i32 = -4;

/// Units above centre a hidden zero is parked at
const HIDDEN_ZERO_UNITS: f32 = 6.0;

/// Units above centre a hidden sign is parked at
const HIDDEN_SIGN_UNITS: f32 = 7.0;

/// Which decimal place a wheel shows and how it behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelDigit {
    /// Power of ten shown by this wheel
    pub place: u8,
    /// Least significant unit of the whole display is tens (ones read 0)
    pub resolution_tens: bool,
    /// Carry a minus sign on this wheel
    pub show_sign: bool,
}

impl WheelDigit {
    pub const fn new(place: u8, resolution_tens: bool) -> Self {
        Self {
            place,
            resolution_tens,
            show_sign: false,
        }
    }

    pub const fn with_sign(mut self) -> Self {
        self.show_sign = true;
        self
    }

    /// Least significant visible wheel shows a literal 0
    pub fn zero_ok(&self) -> bool {
        (self.resolution_tens && self.place == 1) || (!self.resolution_tens && self.place == 0)
    }
}

/// What a slot shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    Digit(u8),
    Minus,
}

/// A glyph and where to draw it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelSlot {
    pub glyph: Glyph,
    pub offset_px: f32,
}

/// Wheel state for one value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelFrame {
    pub digit: u8,
    pub hide_zero: bool,
    /// Roll toward the next digit, 0.0 to 1.0
    pub rotation: f32,
    /// Ten slots, `digit - 4` through `digit + 5`
    pub slots: Vec<WheelSlot, WHEEL_SLOTS>,
    /// Minus sign slot on signed wheels
    pub sign: Option<WheelSlot>,
}

/// Digit at `place` of `floor(|value|)`
pub fn digit_at(value: f32, place: u8) -> u8 {
    let whole = libm::floorf(libm::fabsf(value)) as u64;
    let divisor = 10u64.saturating_pow(u32::from(place));
    ((whole / divisor) % 10) as u8
}

fn check_unit(unit_px: f32) -> Result<(), ConfigError> {
    if unit_px.is_finite() && unit_px > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveLength)
    }
}

/// Single odometer wheel
#[derive(Debug, Clone)]
pub struct WheelDigitMapper {
    digit: WheelDigit,
    unit_px: f32,
    freshness: Freshness<f32>,
    frame: WheelFrame,
}

impl WheelDigitMapper {
    pub fn new(digit: WheelDigit, unit_px: f32) -> Result<Self, ConfigError> {
        check_unit(unit_px)?;
        Ok(Self::with_unit(digit, unit_px))
    }

    /// A full drum of wheels sharing one digit height
    pub fn drum<const N: usize>(
        digits: [WheelDigit; N],
        unit_px: f32,
    ) -> Result<[Self; N], ConfigError> {
        check_unit(unit_px)?;
        Ok(digits.map(|digit| Self::with_unit(digit, unit_px)))
    }

    fn with_unit(digit: WheelDigit, unit_px: f32) -> Self {
        Self {
            digit,
            unit_px,
            freshness: Freshness::new(),
            frame: WheelFrame::default(),
        }
    }

    pub fn digit(&self) -> &WheelDigit {
        &self.digit
    }

    /// Roll fraction contributed by the lower places
    pub fn rotation(&self, value: f32) -> f32 {
        let magnitude = libm::fabsf(value);
        let place_size = libm::powf(10.0, f32::from(self.digit.place));
        let lower = if self.digit.resolution_tens { 10.0 } else { 1.0 };
        if magnitude % place_size > place_size - lower {
            (magnitude % lower) / lower
        } else {
            0.0
        }
    }

    /// Compute the frame for `value` without touching cached state
    pub fn map(&self, value: f32) -> WheelFrame {
        let magnitude = libm::fabsf(value);
        let digit = digit_at(value, self.digit.place);
        let next_place = libm::powf(10.0, f32::from(self.digit.place) + 1.0);
        let hide_zero = digit == 0 && magnitude < next_place && !self.digit.zero_ok();
        let rotation = self.rotation(value);
        let roll = rotation * self.unit_px;

        let mut slots = Vec::new();
        for k in FIRST_SLOT..FIRST_SLOT + WHEEL_SLOTS as i32 {
            let glyph = (i32::from(digit) + k).rem_euclid(10) as u8;
            let offset_px = if k == 0 && hide_zero {
                -HIDDEN_ZERO_UNITS * self.unit_px + roll
            } else {
                -(k as f32) * self.unit_px + roll
            };
            if slots
                .push(WheelSlot {
                    glyph: Glyph::Digit(glyph),
                    offset_px,
                })
                .is_err()
            {
                break;
            }
        }

        let sign = self.digit.show_sign.then(|| {
            let offset_px = if value < 0.0 && hide_zero {
                roll
            } else {
                -HIDDEN_SIGN_UNITS * self.unit_px + roll
            };
            WheelSlot {
                glyph: Glyph::Minus,
                offset_px,
            }
        });

        WheelFrame {
            digit,
            hide_zero,
            rotation,
            slots,
            sign,
        }
    }

    pub fn update(&mut self, value: Option<f32>) -> Redraw {
        match finite(value) {
            Some(value) => {
                if self.freshness.accept(value) {
                    self.frame = self.map(value);
                    Redraw::Needed
                } else {
                    Redraw::Skip
                }
            }
            None => self.freshness.invalidate().into(),
        }
    }

    pub fn frame(&self) -> &WheelFrame {
        &self.frame
    }

    pub fn is_valid(&self) -> bool {
        self.freshness.is_valid()
    }
}

/// Digit at the window centre: the slot closest to offset zero
pub fn centred_glyph(frame: &WheelFrame) -> Option<Glyph> {
    let mut best: Option<&WheelSlot> = None;
    for slot in frame.slots.iter().chain(frame.sign.iter()) {
        if best.map_or(true, |b| libm::fabsf(slot.offset_px) < libm::fabsf(b.offset_px)) {
            best = Some(slot);
        }
    }
    best.map(|slot| slot.glyph)
}
