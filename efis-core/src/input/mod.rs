//! Single-encoder input handling
//!
//! One rotary encoder with a push button drives every adjustable setting.
//! The arbiter decides which [`Target`] the encoder is talking to and hands
//! each one a continuous virtual value of its own.

pub mod arbiter;
pub mod target;

pub use arbiter::*;
pub use target::*;
