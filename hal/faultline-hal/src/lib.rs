//! Faultline Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040, etc.). This enables the same target
//! firmware logic to run on different hardware platforms, and lets the
//! command engine be exercised on the host with deterministic test doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Engine (faultline-core)                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  faultline-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ faultline-hal-│       │ host-side     │
//! │    rp2040     │       │ test doubles  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::StatusLeds`] - Digital outputs (trigger, LEDs)
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`iap::IapMemory`] - In-application-programming memory reads

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod iap;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{OutputPin, StatusLeds};
pub use iap::IapMemory;
pub use uart::{UartRx, UartTx};
