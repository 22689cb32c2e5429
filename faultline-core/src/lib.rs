//! Board-agnostic command engine for the Faultline target firmware
//!
//! This crate contains everything between the serial transport and the
//! chip: the command registry, the dispatch engine, the trigger-line
//! discipline, and the handlers themselves. Nothing here touches
//! hardware directly - all I/O goes through the `faultline-hal` traits,
//! so the whole engine runs on the host against the test doubles in
//! [`mock`].
//!
//! # Dispatch cycle
//!
//! ```text
//! Transport ──▶ FrameParser ──▶ Registry lookup ──▶ length check
//!                                     │                  │
//!                              unknown command      mismatch: status,
//!                              reported as status   handler NOT invoked
//!                                     │                  │
//!                                     └────▶ Handler::invoke ──▶ status
//! ```
//!
//! Two handlers (blink, infinite-loop) intentionally never return; that
//! parks the dispatch loop forever, which is the documented terminal
//! behavior for those commands on a fault-injection target.

#![no_std]
#![deny(unsafe_code)]

pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod mock;
pub mod registry;
pub mod trigger;

pub use context::Context;
pub use dispatch::{Engine, EngineError};
pub use handlers::{default_registry, CommandHandler, Handler, Request};
pub use registry::{CommandEntry, CommandRegistry, RegistryError, MAX_COMMANDS};
pub use trigger::TriggerLine;
