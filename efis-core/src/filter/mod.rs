//! Signal conditioning for noisy sensor inputs
//!
//! Filters advance by true elapsed time taken from millisecond timestamps,
//! not by a fixed step. Non-finite samples are replaced with 0 before they
//! reach any filter state.

pub mod low_pass;
pub mod slip;
pub mod spring;

pub use low_pass::*;
pub use slip::*;
pub use spring::*;

/// Replace a non-finite sample with the neutral value 0
pub fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() {
        sample
    } else {
        0.0
    }
}

/// Milliseconds from `last` to `now`, tolerating timer wraparound
pub(crate) fn elapsed_ms(last: u32, now: u32) -> u32 {
    now.wrapping_sub(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(-2.5), -2.5);
    }

    #[test]
    fn test_elapsed_wraps() {
        assert_eq!(elapsed_ms(100, 150), 50);
        assert_eq!(elapsed_ms(u32::MAX - 9, 10), 20);
    }
}
