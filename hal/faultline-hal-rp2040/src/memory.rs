//! Memory-mapped reads standing in for the IAP sequence
//!
//! The reference MCU family reads CID/UID/APROM through an IAP command
//! sequence. The RP2040 has no such sequence - everything interesting
//! already sits in the address map - so the opcode selects a base
//! address instead: APROM reads come from XIP flash, the
//! identification opcodes read the bootrom.

use faultline_hal::iap::{IapMemory, READ_APROM};

/// Bootrom base (identification reads)
const BOOTROM_BASE: u32 = 0x0000_0000;

/// XIP flash base (APROM reads)
const XIP_BASE: u32 = 0x1000_0000;

/// Bootrom magic/version byte offsets, reported as the trim pair
const BOOTROM_MAGIC: u32 = 0x10;
const BOOTROM_VERSION: u32 = 0x13;

/// Raw memory reader over the RP2040 address map
#[derive(Debug, Default)]
pub struct McuMemory {
    _private: (),
}

impl McuMemory {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn base_for(op: u8) -> u32 {
        match op {
            READ_APROM => XIP_BASE,
            _ => BOOTROM_BASE,
        }
    }

    fn read_byte(addr: u32) -> u8 {
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }
}

impl IapMemory for McuMemory {
    fn read(&mut self, op: u8, start: u16, buf: &mut [u8]) {
        let base = Self::base_for(op);
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = Self::read_byte(base + start as u32 + i as u32);
        }
    }

    fn rc_trim(&mut self) -> [u8; 2] {
        // The RP2040 has no RC trim registers; the bootrom magic and
        // version bytes serve as the stable identification pair
        [
            Self::read_byte(BOOTROM_MAGIC),
            Self::read_byte(BOOTROM_VERSION),
        ]
    }
}
