//! RP2040-specific HAL for the Faultline target firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `faultline-hal` traits over embassy-rp's blocking APIs:
//!
//! - GPIO outputs for the trigger line and indicator LEDs
//! - Blocking UART halves for the command transport
//! - Memory-mapped reads standing in for the IAP sequence

#![no_std]

pub mod gpio;
pub mod memory;
pub mod uart;

pub use gpio::Leds;
pub use memory::McuMemory;
pub use uart::{SerialRx, SerialTx};
