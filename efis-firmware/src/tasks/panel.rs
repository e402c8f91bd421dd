//! Panel task
//!
//! Owns the [`Panel`]. Snapshots are taken as soon as they arrive; every
//! tick samples the encoder, recomputes the panel and hands any due report
//! to the transmit task.

use defmt::*;
use embassy_futures::select::{select, Either};
use portable_atomic::Ordering;

use efis_core::config::PanelConfig;
use efis_core::input::EncoderSample;
use efis_core::panel::{Panel, PanelFrame};
use efis_core::telemetry::LinkStatus;

use crate::channels::{ENCODER_POSITION, ENCODER_PRESSED, REPORT, SNAPSHOT};
use crate::tasks::tick::{now_ms, TICK_SIGNAL};

#[embassy_executor::task]
pub async fn panel_task(config: PanelConfig) {
    info!("Panel task started");

    let mut panel = match Panel::new(config) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Invalid panel configuration: {}", e);
            return;
        }
    };

    loop {
        match select(TICK_SIGNAL.wait(), SNAPSHOT.wait()).await {
            Either::First(now) => {
                let sample = EncoderSample::new(
                    ENCODER_POSITION.load(Ordering::Relaxed),
                    ENCODER_PRESSED.load(Ordering::Relaxed),
                );
                let frame = panel.tick(Some(sample), now);
                publish(&frame);
            }
            Either::Second(snapshot) => panel.receive(snapshot, now_ms()),
        }
    }
}

fn publish(frame: &PanelFrame) {
    if frame.link_changed {
        match frame.link {
            LinkStatus::Live => info!("Telemetry link up"),
            LinkStatus::Stale => warn!("Telemetry link lost"),
            LinkStatus::Waiting => {}
        }
    }

    if let Some(report) = frame.report {
        REPORT.signal(report);
    }

    if frame.needs_redraw() {
        trace!(
            "Frame: link={} heading={} controls_redraw={}",
            frame.link,
            frame.heading.frame.readout.as_str(),
            frame.controls_redraw
        );
    }
}
