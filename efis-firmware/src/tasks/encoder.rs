//! Rotary encoder and push button
//!
//! Decodes quadrature with a noise-rejecting state machine and accumulates
//! an absolute detent count. The panel samples the count and the debounced
//! button on every tick.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use crate::channels::{ENCODER_POSITION, ENCODER_PRESSED};

/// Poll period for the encoder pins
const POLL_MS: u64 = 2;

/// Consecutive identical button reads before a change is accepted
const DEBOUNCE_POLLS: u8 = 5;

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum Step {
    Cw,
    Ccw,
}

impl State {
    /// Advance on a new A/B reading (pins are high at rest)
    ///
    /// CW: A falls first, then both low, then either rises.
    /// CCW: B falls first, then both low, then either rises.
    fn next(self, a: bool, b: bool) -> (Self, Option<Step>) {
        use State::*;

        match self {
            Idle if !a && b => (CwStep1, None),
            Idle if a && !b => (CcwStep1, None),
            CwStep1 if !a && !b => (CwStep2, None),
            CcwStep1 if !a && !b => (CcwStep2, None),
            // Bounce back to rest
            CwStep1 | CcwStep1 if a && b => (Idle, None),
            CwStep2 if a || b => (Idle, Some(Step::Cw)),
            CcwStep2 if a || b => (Idle, Some(Step::Ccw)),
            _ => (self, None),
        }
    }
}

/// Button debouncer; the pin reads low while pressed
struct Debounce {
    stable: bool,
    candidate: bool,
    count: u8,
}

impl Debounce {
    fn new() -> Self {
        Self {
            stable: false,
            candidate: false,
            count: 0,
        }
    }

    /// Feed one raw read, returns the debounced state
    fn update(&mut self, pressed: bool) -> bool {
        if pressed == self.stable {
            self.count = 0;
        } else if pressed == self.candidate {
            self.count += 1;
            if self.count >= DEBOUNCE_POLLS {
                self.stable = pressed;
                self.count = 0;
            }
        } else {
            self.candidate = pressed;
            self.count = 1;
        }
        self.stable
    }
}

#[embassy_executor::task]
pub async fn encoder_task(a: Input<'static>, b: Input<'static>, button: Input<'static>) {
    info!("Encoder task started");

    let mut state = State::Idle;
    let mut last = (a.is_high(), b.is_high());
    let mut debounce = Debounce::new();

    loop {
        Timer::after(Duration::from_millis(POLL_MS)).await;

        let reading = (a.is_high(), b.is_high());
        if reading != last {
            let (next, step) = state.next(reading.0, reading.1);
            state = next;
            last = reading;
            match step {
                Some(Step::Cw) => {
                    let position = ENCODER_POSITION.fetch_add(1, Ordering::Relaxed);
                    trace!("Encoder CW -> {}", position.wrapping_add(1));
                }
                Some(Step::Ccw) => {
                    let position = ENCODER_POSITION.fetch_sub(1, Ordering::Relaxed);
                    trace!("Encoder CCW -> {}", position.wrapping_sub(1));
                }
                None => {}
            }
        }

        let pressed = debounce.update(button.is_low());
        if ENCODER_PRESSED.swap(pressed, Ordering::Relaxed) != pressed {
            debug!("Button {}", if pressed { "pressed" } else { "released" });
        }
    }
}
