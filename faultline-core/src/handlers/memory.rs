//! Memory dump handlers
//!
//! `MemoryRead` serves arbitrary read-only IAP dumps from a 4-byte
//! descriptor; `TrimRead` returns the fixed calibration/identification
//! block hosts use to fingerprint a device. Erase and program opcodes
//! are refused before the IAP layer is reached - this target leaks
//! memory on purpose, it does not brick itself on purpose.

use embedded_hal::delay::DelayNs;

use faultline_hal::iap::{DESTRUCTIVE_OP_MASK, READ_UID};
use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

/// Largest read a single descriptor may request
pub const MAX_READ_LEN: usize = 128;

/// Offset of the UID bytes in the chip's configuration space
const UID_START: u16 = 0x30;

/// UID bytes returned after the two trim bytes
const UID_LEN: usize = 10;

/// Raw device memory read
///
/// Descriptor layout: `[opcode][start lo][start hi][len]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryRead;

impl Handler for MemoryRead {
    fn invoke<T, P, S, D, M>(
        &mut self,
        req: &Request<'_>,
        ctx: &mut Context<'_, T, P, S, D, M>,
    ) -> Result<Status, T::Error>
    where
        T: UartTx,
        P: OutputPin,
        S: StatusLeds,
        D: DelayNs,
        M: IapMemory,
    {
        if req.payload.len() != 4 {
            return Ok(Status::LengthError);
        }
        let op = req.payload[0];
        if op & DESTRUCTIVE_OP_MASK != 0 {
            return Ok(Status::DestructiveOp);
        }
        let start = u16::from_le_bytes([req.payload[1], req.payload[2]]);
        let len = req.payload[3] as usize;
        if len > MAX_READ_LEN {
            return Ok(Status::ReadTooLong);
        }

        let mut buf = [0u8; MAX_READ_LEN];
        ctx.memory.read(op, start, &mut buf[..len]);
        ctx.put(TAG_DATA, &buf[..len])?;
        Ok(Status::Ok)
    }
}

/// Calibration/identification block read
///
/// Emits 12 bytes: the RC oscillator trim register pair followed by
/// [`UID_LEN`] unique-ID bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimRead;

impl Handler for TrimRead {
    fn invoke<T, P, S, D, M>(
        &mut self,
        _req: &Request<'_>,
        ctx: &mut Context<'_, T, P, S, D, M>,
    ) -> Result<Status, T::Error>
    where
        T: UartTx,
        P: OutputPin,
        S: StatusLeds,
        D: DelayNs,
        M: IapMemory,
    {
        let mut block = [0u8; 2 + UID_LEN];
        let trim = ctx.memory.rc_trim();
        block[0] = trim[0];
        block[1] = trim[1];
        ctx.memory.read(READ_UID, UID_START, &mut block[2..]);

        ctx.put(TAG_DATA, &block)?;
        Ok(Status::Ok)
    }
}
