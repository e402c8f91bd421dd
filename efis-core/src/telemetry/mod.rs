//! Inbound telemetry
//!
//! The sensor side delivers whole [`Snapshot`]s. A field left as `None` has
//! no data in this snapshot; it is never read as zero.

pub mod link;
pub mod snapshot;

pub use link::*;
pub use snapshot::*;
