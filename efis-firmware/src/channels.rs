//! Inter-task communication
//!
//! Signals hold only the latest value: a newer snapshot or report replaces
//! one that was never taken.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicI32};

use efis_core::report::SettingsReport;
use efis_core::telemetry::Snapshot;

/// Latest decoded telemetry snapshot
pub static SNAPSHOT: Signal<CriticalSectionRawMutex, Snapshot> = Signal::new();

/// Settings report waiting to be sent
pub static REPORT: Signal<CriticalSectionRawMutex, SettingsReport> = Signal::new();

/// Absolute encoder detent count since power-on
pub static ENCODER_POSITION: AtomicI32 = AtomicI32::new(0);

/// Debounced encoder button state
pub static ENCODER_PRESSED: AtomicBool = AtomicBool::new(false);
