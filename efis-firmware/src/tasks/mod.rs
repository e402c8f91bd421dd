//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals and atomics.

pub mod encoder;
pub mod panel;
pub mod report_tx;
pub mod telemetry_rx;
pub mod tick;

pub use encoder::encoder_task;
pub use panel::panel_task;
pub use report_tx::report_tx_task;
pub use telemetry_rx::telemetry_rx_task;
pub use tick::tick_task;
