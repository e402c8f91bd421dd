//! Telemetry snapshot

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mapping::ToFrom;

/// One complete telemetry record
///
/// Replaced wholesale on receipt, never merged field by field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Indicated altitude (ft)
    pub altitude_ft: Option<f32>,
    /// Indicated airspeed (kt)
    pub airspeed_kt: Option<f32>,
    pub pitch_deg: Option<f32>,
    pub roll_deg: Option<f32>,
    /// Magnetic heading
    pub yaw_deg: Option<f32>,
    /// Body lateral acceleration (m/s²)
    pub lateral_accel: Option<f32>,
    /// Body vertical acceleration (m/s²)
    pub vertical_accel: Option<f32>,
    pub vertical_speed_fpm: Option<f32>,
    pub turn_rate_deg_s: Option<f32>,
    pub gps_speed_kt: Option<f32>,
    pub gps_track_deg: Option<f32>,
    pub gps_altitude_ft: Option<f32>,
    pub static_pressure_hpa: Option<f32>,
    /// Pitot minus static
    pub differential_pressure_hpa: Option<f32>,
    /// Air temperature probe (°C)
    pub temperature_c: Option<f32>,
    /// Cross-track error, positive right of course (NM)
    pub cross_track_nm: Option<f32>,
    pub to_from: Option<ToFrom>,
    pub desired_track_deg: Option<f32>,
    /// UTC time of day
    pub hour: Option<u8>,
    pub minute: Option<u8>,
}

impl Snapshot {
    /// Snapshot with no data at all
    pub const fn empty() -> Self {
        Self {
            altitude_ft: None,
            airspeed_kt: None,
            pitch_deg: None,
            roll_deg: None,
            yaw_deg: None,
            lateral_accel: None,
            vertical_accel: None,
            vertical_speed_fpm: None,
            turn_rate_deg_s: None,
            gps_speed_kt: None,
            gps_track_deg: None,
            gps_altitude_ft: None,
            static_pressure_hpa: None,
            differential_pressure_hpa: None,
            temperature_c: None,
            cross_track_nm: None,
            to_from: None,
            desired_track_deg: None,
            hour: None,
            minute: None,
        }
    }

    /// Decode a COBS-framed postcard snapshot in place
    #[cfg(feature = "serde")]
    pub fn decode(frame: &mut [u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes_cobs(frame)
    }
}
