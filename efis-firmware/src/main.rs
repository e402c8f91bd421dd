//! EFIS display firmware
//!
//! Runs the instrument panel on an RP2040: telemetry snapshots arrive over
//! UART0, the pilot adjusts settings with one push-button rotary encoder,
//! and settings reports go back out over the same UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use efis_core::config::PanelConfig;

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Telemetry link baud rate
const LINK_BAUD: u32 = 115_200;

// UART buffers must live forever
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("EFIS firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUD;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    // GPIO0 TX, GPIO1 RX
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", LINK_BAUD);

    // Encoder A/B on GPIO2/3, push button on GPIO4, all active low
    let encoder_a = Input::new(p.PIN_2, Pull::Up);
    let encoder_b = Input::new(p.PIN_3, Pull::Up);
    let button = Input::new(p.PIN_4, Pull::Up);

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner
        .spawn(tasks::encoder_task(encoder_a, encoder_b, button))
        .unwrap();
    spawner.spawn(tasks::telemetry_rx_task(rx)).unwrap();
    spawner.spawn(tasks::report_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::panel_task(PanelConfig::default()))
        .unwrap();

    info!("All tasks spawned");
}
