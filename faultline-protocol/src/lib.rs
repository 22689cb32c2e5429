//! Faultline Command Protocol
//!
//! This crate defines the UART-based command protocol between a host
//! controller and the Faultline target device. The protocol exists in two
//! wire formats; a link always runs exactly one of them, but both are
//! ordinary runtime values here so that both can be exercised in one build.
//!
//! # Protocol Overview
//!
//! Incoming command frames:
//! ```text
//! V1:  ┌─────┬─────────────┐            payload length is the length
//!      │ CMD │ PAYLOAD     │            registered for CMD - there is no
//!      │ 1B  │ 0-249B      │            length byte on the wire
//!      └─────┴─────────────┘
//!
//! V2:  ┌─────┬──────┬─────┬─────────────┐
//!      │ CMD │ SCMD │ LEN │ PAYLOAD     │
//!      │ 1B  │ 1B   │ 1B  │ 0-249B      │
//!      └─────┴──────┴─────┴─────────────┘
//! ```
//!
//! Outgoing emissions (both formats):
//! ```text
//!      ┌─────┬─────┬─────────────┐
//!      │ TAG │ LEN │ DATA        │      zero or more data emissions,
//!      │ 1B  │ 1B  │ 0-249B      │      then exactly one status emission
//!      └─────┴─────┴─────────────┘
//! ```
//!
//! Neither format carries a checksum; integrity is the physical
//! transport's problem. The target is a fault-injection victim, so the
//! decode path is intentionally trusting: once a command byte arrives, the
//! engine commits to reading the full declared payload.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;
pub mod response;
pub mod status;

pub use frame::{
    Frame, FrameError, FrameParser, LenResolver, PayloadLen, WireFormat, MAX_PAYLOAD_SIZE,
};
pub use response::{Response, MAX_RESPONSE_SIZE, TAG_DATA, TAG_STATUS};
pub use status::Status;

/// Banner emitted once after reset, before the command loop starts
///
/// A debugging convenience for humans watching the serial line, not part
/// of the binary protocol. Hosts treat it as a log line.
pub const RESET_BANNER: &[u8] = b"rRESET   \n";
