//! Deterministic test doubles for the HAL traits
//!
//! The engine is exercised on the host by scripting the receive side
//! with canned byte streams and capturing everything the target
//! transmits. All doubles are plain data with no interior mutability,
//! so every test run is bit-for-bit reproducible.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartRx, UartTx};

/// Error returned once a scripted byte stream is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxExhausted;

/// Receiver that replays a canned byte stream, then errors
#[derive(Debug, Clone, Default)]
pub struct ScriptedRx {
    data: Vec<u8, 512>,
    pos: usize,
}

impl ScriptedRx {
    /// Script the receiver with `bytes` (at most the 512-byte capacity)
    pub fn new(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= 512);
        let mut data = Vec::new();
        let _ = data.extend_from_slice(bytes);
        Self { data, pos: 0 }
    }
}

impl UartRx for ScriptedRx {
    type Error = RxExhausted;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        for slot in buf.iter_mut() {
            let &byte = self.data.get(self.pos).ok_or(RxExhausted)?;
            *slot = byte;
            self.pos += 1;
        }
        Ok(())
    }
}

/// Transmitter that captures everything written
#[derive(Debug, Clone, Default)]
pub struct CaptureTx {
    /// Every byte transmitted, in order
    pub written: Vec<u8, 1024>,
}

impl CaptureTx {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UartTx for CaptureTx {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        // Captures longer than the buffer are a test-author error
        let _ = self.written.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Output pin that records its edge transitions
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingPin {
    high: bool,
    /// Low-to-high transitions observed
    pub rises: u32,
    /// High-to-low transitions observed
    pub falls: u32,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) {
        if !self.high {
            self.rises += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if self.high {
            self.falls += 1;
        }
        self.high = false;
    }

    fn toggle(&mut self) {
        if self.high {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Indicator LED pair that remembers its last state
#[derive(Debug, Clone, Copy, Default)]
pub struct MockLeds {
    pub ok: bool,
    pub error: bool,
}

impl MockLeds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusLeds for MockLeds {
    fn set_ok(&mut self, on: bool) {
        self.ok = on;
    }

    fn set_error(&mut self, on: bool) {
        self.error = on;
    }
}

/// Delay provider that returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Byte-addressable memory double with a recognizable fill pattern
///
/// Address `a` reads as `a & 0xFF` regardless of opcode, so tests can
/// predict every byte of a dump. Records how often it was read and with
/// which opcode, letting tests prove a rejected request never reached
/// the memory interface.
#[derive(Debug, Clone)]
pub struct FlatMemory {
    /// Number of read sequences performed
    pub reads: u32,
    /// Opcode of the most recent read
    pub last_op: Option<u8>,
    /// Value returned by `rc_trim`
    pub trim: [u8; 2],
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            reads: 0,
            last_op: None,
            trim: [0x5A, 0x3C],
        }
    }
}

impl IapMemory for FlatMemory {
    fn read(&mut self, op: u8, start: u16, buf: &mut [u8]) {
        self.reads += 1;
        self.last_op = Some(op);
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = (start as usize + i) as u8;
        }
    }

    fn rc_trim(&mut self) -> [u8; 2] {
        self.trim
    }
}
