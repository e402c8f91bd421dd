//! Board-agnostic core logic for the EFIS display
//!
//! This crate contains every piece of instrument logic that does not depend
//! on a graphics library or on specific hardware:
//!
//! - Value-to-position mapping (scrolling tapes, odometer wheels, compass
//!   ribbon and rotating dial, bar indicators)
//! - Signal conditioning filters (exponential low-pass, spring-damper)
//! - Single-encoder arbitration across pilot-adjustable settings
//! - Concrete settings (barometric setting, bugs, display modes, brightness)
//! - Telemetry snapshot and link health tracking
//! - Rate-limited settings report back to the sensor source
//! - The panel orchestrator tying all of the above to a periodic tick

#![no_std]
#![deny(unsafe_code)]

pub mod air;
pub mod config;
pub mod filter;
pub mod input;
pub mod mapping;
pub mod panel;
pub mod report;
pub mod settings;
pub mod telemetry;
