//! Telemetry UART receive task
//!
//! Snapshots arrive as COBS-framed postcard messages terminated by a zero
//! byte. Each complete frame is decoded and published; a bad frame is
//! logged and dropped without disturbing the next one.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::Vec;

use efis_core::telemetry::Snapshot;

use crate::channels::SNAPSHOT;

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 64;

/// Largest encoded snapshot accepted
const MAX_FRAME_LEN: usize = 192;

/// Telemetry frame problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum DecodeError {
    /// Frame grew past `MAX_FRAME_LEN` before its terminator
    Overflow,
    /// COBS or postcard decoding failed
    Malformed,
}

/// Accumulates bytes up to a frame terminator
struct FrameAssembler {
    buf: Vec<u8, MAX_FRAME_LEN>,
    /// Dropping bytes until the next terminator
    discarding: bool,
}

impl FrameAssembler {
    fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte; a terminator yields the decoded frame
    fn feed(&mut self, byte: u8) -> Option<Result<Snapshot, DecodeError>> {
        if byte == 0 {
            if self.discarding {
                self.discarding = false;
                return Some(Err(DecodeError::Overflow));
            }
            if self.buf.is_empty() {
                return None;
            }
            // Terminator goes back in for the COBS decoder
            let result = match self.buf.push(0) {
                Ok(()) => Snapshot::decode(&mut self.buf).map_err(|_| DecodeError::Malformed),
                Err(_) => Err(DecodeError::Overflow),
            };
            self.buf.clear();
            return Some(result);
        }
        if !self.discarding && self.buf.push(byte).is_err() {
            self.buf.clear();
            self.discarding = true;
        }
        None
    }
}

#[embassy_executor::task]
pub async fn telemetry_rx_task(mut rx: BufferedUartRx) {
    info!("Telemetry RX task started");

    let mut assembler = FrameAssembler::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match assembler.feed(byte) {
                        Some(Ok(snapshot)) => SNAPSHOT.signal(snapshot),
                        Some(Err(e)) => warn!("Dropped telemetry frame: {:?}", e),
                        None => {}
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
