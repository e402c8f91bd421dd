//! Configuration types
//!
//! Panel geometry, filter constants and setting ranges, plus the errors
//! raised when they are inconsistent.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
