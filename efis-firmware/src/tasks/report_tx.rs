//! Settings report transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use efis_core::report::MAX_REPORT_LEN;

use crate::channels::REPORT;

#[embassy_executor::task]
pub async fn report_tx_task(mut tx: BufferedUartTx) {
    info!("Report TX task started");

    let mut buf = [0u8; MAX_REPORT_LEN];

    loop {
        let report = REPORT.wait().await;

        let frame = match report.encode(&mut buf) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode report: {}", e);
                continue;
            }
        };
        if let Err(e) = tx.write_all(frame).await {
            warn!("Failed to send report: {:?}", e);
        } else {
            trace!("Report sent: {:?}", report);
        }
    }
}
