//! Air data computations
//!
//! Pressures in hPa, temperatures in °C, altitudes in ft, speeds in kt.
//! Inputs that cannot produce a meaningful result give `None`.

/// ISA sea level pressure
pub const STANDARD_PRESSURE_HPA: f32 = 1013.25;

const CELSIUS_TO_KELVIN: f32 = 273.15;
const STANDARD_TEMP_K: f32 = CELSIUS_TO_KELVIN + 15.0;

/// Standard lapse rate (K/ft)
const LAPSE_RATE: f32 = 0.001_981_2;
const DENSITY_EXPONENT: f32 = 0.234_960;

/// Ratio of specific heats of air
const GAMMA: f32 = 1.401;
/// Specific gas constant of dry air (J/kg·K)
const R_AIR: f32 = 287.05;
const RECOVERY_FACTOR: f32 = 0.95;
const MPS_TO_KNOTS: f32 = 1.943_844;

/// Pressure altitude from static pressure
pub fn pressure_altitude_ft(static_hpa: f32) -> Option<f32> {
    if !(static_hpa.is_finite() && static_hpa > 0.0) {
        return None;
    }
    Some(145_442.0 * (1.0 - libm::powf(static_hpa / STANDARD_PRESSURE_HPA, 0.190_263_2)))
}

/// Density altitude from pressure altitude and outside air temperature
pub fn density_altitude_ft(pressure_altitude_ft: f32, oat_c: f32) -> Option<f32> {
    let oat_k = oat_c + CELSIUS_TO_KELVIN;
    if !(pressure_altitude_ft.is_finite() && oat_k.is_finite() && oat_k > 0.0) {
        return None;
    }
    let std_temp_k = STANDARD_TEMP_K - LAPSE_RATE * pressure_altitude_ft;
    let density = pressure_altitude_ft
        + (std_temp_k / LAPSE_RATE) * (1.0 - libm::powf(std_temp_k / oat_k, DENSITY_EXPONENT));
    density.is_finite().then_some(density)
}

/// Mach number from the compressible pitot relation
///
/// Negative differential pressure reads as zero airspeed.
pub fn mach(static_hpa: f32, differential_hpa: f32) -> Option<f32> {
    if !(static_hpa.is_finite() && static_hpa > 0.0 && differential_hpa.is_finite()) {
        return None;
    }
    let qc = differential_hpa.max(0.0);
    let ratio = libm::powf(qc / static_hpa + 1.0, (GAMMA - 1.0) / GAMMA);
    Some(libm::sqrtf(2.0 / (GAMMA - 1.0) * (ratio - 1.0)))
}

/// True airspeed from static and pitot pressures and the probe temperature
///
/// The probe reads warm from ram rise; the recovery factor corrects it back
/// to static air temperature before the speed of sound is taken.
pub fn true_airspeed_kt(static_hpa: f32, differential_hpa: f32, indicated_c: f32) -> Option<f32> {
    let mach = mach(static_hpa, differential_hpa)?;
    let oat_k = (indicated_c + CELSIUS_TO_KELVIN) / (1.0 + 0.2 * RECOVERY_FACTOR * mach * mach);
    if !(oat_k.is_finite() && oat_k > 0.0) {
        return None;
    }
    let speed_of_sound = libm::sqrtf(GAMMA * R_AIR) * MPS_TO_KNOTS * libm::sqrtf(oat_k);
    Some(mach * speed_of_sound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f32>, b: f32, tolerance: f32) -> bool {
        a.map_or(false, |a| (a - b).abs() <= tolerance)
    }

    #[test]
    fn test_pressure_altitude() {
        assert!(close(pressure_altitude_ft(STANDARD_PRESSURE_HPA), 0.0, 0.5));
        assert!(close(pressure_altitude_ft(843.0), 5002.3, 2.0));
        assert!(close(pressure_altitude_ft(700.0), 9882.5, 3.0));
        assert_eq!(pressure_altitude_ft(0.0), None);
        assert_eq!(pressure_altitude_ft(f32::NAN), None);
    }

    #[test]
    fn test_density_altitude() {
        // ISA day: density altitude equals pressure altitude
        assert!(close(density_altitude_ft(0.0, 15.0), 0.0, 0.5));
        assert!(close(density_altitude_ft(5000.0, 5.1), 5000.7, 2.0));
        // Hot day
        assert!(close(density_altitude_ft(5000.0, 30.0), 7800.6, 3.0));
        assert_eq!(density_altitude_ft(5000.0, -300.0), None);
    }

    #[test]
    fn test_true_airspeed() {
        assert!(close(true_airspeed_kt(1013.25, 0.0, 15.0), 0.0, 1e-3));
        assert!(close(true_airspeed_kt(1013.25, 7.1218, 15.0), 66.14, 0.2));
        assert!(close(true_airspeed_kt(1013.25, 20.0, 15.0), 110.40, 0.3));
        // Negative pitot pressure clamps to zero speed
        assert!(close(true_airspeed_kt(1013.25, -3.0, 15.0), 0.0, 1e-3));
        assert_eq!(true_airspeed_kt(0.0, 5.0, 15.0), None);
    }

    #[test]
    fn test_mach() {
        assert!(close(mach(1013.25, 7.1218), 0.1, 1e-3));
    }
}
