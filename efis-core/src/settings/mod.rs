//! Pilot-adjustable settings
//!
//! Each setting is a [`Target`](crate::input::Target). All of them read the
//! absolute virtual value handed over by the arbiter; none keeps its own
//! copy of the raw encoder position.

pub mod bug;
pub mod clamped;
pub mod cycle;
pub mod wrapped;

pub use bug::*;
pub use clamped::*;
pub use cycle::*;
pub use wrapped::*;
