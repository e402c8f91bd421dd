//! Outbound settings report
//!
//! The sensor side needs the barometric setting to compute altitude, and the
//! brightness to drive the backlight. Reports go out when either changes and
//! otherwise once per interval so a restarted sensor picks them up.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest encoded report, COBS overhead included
pub const MAX_REPORT_LEN: usize = 16;

/// Adjustable settings sent back to the sensor source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingsReport {
    /// Barometric setting, inHg × 100
    pub qnh_inhg_x100: i32,
    pub brightness_pct: u8,
}

/// Report encoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Output buffer cannot hold the encoded frame
    BufferTooSmall,
}

impl core::fmt::Display for ReportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("report buffer too small"),
        }
    }
}

#[cfg(feature = "serde")]
impl SettingsReport {
    /// Encode as a COBS-framed postcard message, zero terminator included
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ReportError> {
        postcard::to_slice_cobs(self, buf).map_err(|_| ReportError::BufferTooSmall)
    }
}

/// Decides when a report is due
#[derive(Debug, Clone)]
pub struct ReportLimiter {
    interval_ms: u32,
    last: Option<(SettingsReport, u32)>,
}

impl ReportLimiter {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Returns the report if it should be sent now
    ///
    /// Sent when it differs from the last one sent, when the interval has
    /// elapsed, and always on the first poll.
    pub fn poll(&mut self, report: SettingsReport, now_ms: u32) -> Option<SettingsReport> {
        let due = match self.last {
            None => true,
            Some((sent, at)) => sent != report || now_ms.wrapping_sub(at) >= self.interval_ms,
        };
        if due {
            self.last = Some((report, now_ms));
            Some(report)
        } else {
            None
        }
    }
}
