//! Faultline - fault-injection target firmware
//!
//! Main firmware binary for RP2040-based target boards. Brings up the
//! serial command link, the trigger line, and the indicator LEDs, then
//! hands everything to the dispatch engine for the life of the device.
//!
//! The whole target is one blocking control loop - there is nothing to
//! schedule, and a deterministic instruction stream is exactly what a
//! glitch bench wants to aim at.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::uart::{Config as UartConfig, Uart};
use {defmt_rtt as _, panic_probe as _};

use faultline_core::{default_registry, Engine};
use faultline_hal_rp2040::{Leds, McuMemory, SerialRx, SerialTx};
use faultline_protocol::WireFormat;

/// Command link baud rate
const BAUD_RATE: u32 = 115_200;

// The wire format is a build selection; a flashed target speaks exactly
// one. Both formats remain ordinary values for host-side testing.
#[cfg(feature = "protocol-v1")]
const WIRE_FORMAT: WireFormat = WireFormat::V1;
#[cfg(not(feature = "protocol-v1"))]
const WIRE_FORMAT: WireFormat = WireFormat::V2;

#[entry]
fn main() -> ! {
    info!("Faultline target starting...");

    let p = embassy_rp::init(Default::default());

    // Command link on UART0 (GPIO0 TX / GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let (tx, rx) = uart.split();

    // Trigger on GPIO4, LEDs on GPIO12 (ok) / GPIO5 (error), matching
    // the reference board's P0.4 / P1.2 / P0.5 assignment
    let trigger_pin = Output::new(p.PIN_4, Level::Low);
    let leds = Leds::new(
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_5, Level::Low),
    );

    let registry = match default_registry(WIRE_FORMAT) {
        Ok(registry) => registry,
        Err(e) => panic!("command table misconfigured: {:?}", e),
    };
    info!(
        "command table ready: {} commands, wire format {:?}",
        registry.len(),
        WIRE_FORMAT
    );

    let mut engine = Engine::new(
        SerialRx::new(rx),
        SerialTx::new(tx),
        WIRE_FORMAT,
        registry,
        trigger_pin,
        leds,
        embassy_time::Delay,
        McuMemory::new(),
    );

    // Device reset detected - tell anyone listening
    if engine.announce_reset().is_err() {
        warn!("reset banner not sent");
    }

    info!("entering command loop");
    loop {
        let err = engine.run();
        warn!("transport fault, resuming: {:?}", err);
    }
}
