//! In-application-programming (IAP) memory access
//!
//! The memory-read and calibration-read commands expose raw device memory
//! through the chip's IAP command sequence. The trait captures only the
//! read side; erase/program opcodes are rejected before this layer is ever
//! reached (see the destructive-operation mask below).

/// IAP command codes for the read operations the target serves
///
/// These are the ISP/IAP opcode values of the reference MCU family; any
/// opcode with [`DESTRUCTIVE_OP_MASK`] set performs an erase or program
/// cycle and is never forwarded to an [`IapMemory`] implementation.
pub const READ_APROM: u8 = 0x00;
/// Read the 96-bit unique device ID
pub const READ_UID: u8 = 0x04;
/// Read the company ID byte
pub const READ_CID: u8 = 0x0B;
/// Read the device ID bytes
pub const READ_DID: u8 = 0x0C;
/// Byte-program APROM (destructive)
pub const BYTE_PROGRAM_AP: u8 = 0x21;
/// Page-erase APROM (destructive)
pub const PAGE_ERASE_AP: u8 = 0x22;

/// Bit set on every erase/program IAP opcode
pub const DESTRUCTIVE_OP_MASK: u8 = 0x20;

/// Raw device memory read via the chip's IAP sequence
///
/// Operations are infallible: the IAP read sequence on the supported chips
/// always completes. Address windows that do not decode read as whatever
/// the bus returns, which is exactly what a memory-dump target should
/// report.
pub trait IapMemory {
    /// Read `buf.len()` bytes starting at `start` in the address space
    /// selected by the IAP opcode `op`
    fn read(&mut self, op: u8, start: u16, buf: &mut [u8]);

    /// Read the internal RC oscillator trim register pair
    fn rc_trim(&mut self) -> [u8; 2];
}
