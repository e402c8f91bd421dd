//! Construction-time configuration errors

use core::fmt;

/// Reason a panel or instrument could not be constructed
///
/// These are fatal: a panel is never built from a configuration that fails
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tape major interval count must be even so labels sit symmetric around centre
    OddMajorIntervalCount(u8),
    /// Tape major interval count is zero or exceeds label capacity
    TooManyLabels(u8),
    /// Tape major interval size is zero
    ZeroMajorIntervalSize,
    /// A pixel length or spacing is zero, negative or not finite
    NonPositiveLength,
    /// A filter time constant is zero, negative or not finite
    NonPositiveTimeConstant,
    /// Spring stiffness is zero, negative or not finite
    NonPositiveStiffness,
    /// Spring damping is negative or not finite
    NegativeDamping,
    /// Compass window would need more ticks than fit
    TooManyTicks,
    /// Setting range has `min > max` or initial value outside it
    EmptyRange,
    /// Setting step is zero
    ZeroStep,
    /// Mode cycle has no modes
    ZeroModeCount,
    /// Arbiter target capacity exhausted
    TooManyTargets,
    /// Target registered after the arbiter saw its first encoder sample
    RegistrationClosed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddMajorIntervalCount(n) => {
                write!(f, "tape major interval count must be even, got {}", n)
            }
            Self::TooManyLabels(n) => {
                write!(f, "tape major interval count {} outside label capacity", n)
            }
            Self::ZeroMajorIntervalSize => f.write_str("tape major interval size must be non-zero"),
            Self::NonPositiveLength => f.write_str("pixel lengths must be positive and finite"),
            Self::NonPositiveTimeConstant => {
                f.write_str("filter time constant must be positive and finite")
            }
            Self::NonPositiveStiffness => f.write_str("spring stiffness must be positive and finite"),
            Self::NegativeDamping => f.write_str("spring damping must be non-negative and finite"),
            Self::TooManyTicks => f.write_str("compass window needs more ticks than fit"),
            Self::EmptyRange => f.write_str("setting range is empty or excludes its initial value"),
            Self::ZeroStep => f.write_str("setting step must be non-zero"),
            Self::ZeroModeCount => f.write_str("mode cycle needs at least one mode"),
            Self::TooManyTargets => f.write_str("encoder target capacity exhausted"),
            Self::RegistrationClosed => {
                f.write_str("targets must be registered before the first encoder sample")
            }
        }
    }
}
