//! Blocking UART halves for RP2040
//!
//! Thin wrappers giving embassy-rp's blocking UART the `faultline-hal`
//! transport traits. The command engine is byte-synchronous, so the
//! blocking API (not the buffered/async one) is the right fit here.

use embassy_rp::uart::{Blocking, Error, UartRx, UartTx};

use faultline_hal::uart;

/// Transmit half of the command link
pub struct SerialTx<'d> {
    inner: UartTx<'d, Blocking>,
}

impl<'d> SerialTx<'d> {
    pub fn new(inner: UartTx<'d, Blocking>) -> Self {
        Self { inner }
    }
}

impl<'d> uart::UartTx for SerialTx<'d> {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.blocking_flush()
    }
}

/// Receive half of the command link
pub struct SerialRx<'d> {
    inner: UartRx<'d, Blocking>,
}

impl<'d> SerialRx<'d> {
    pub fn new(inner: UartRx<'d, Blocking>) -> Self {
        Self { inner }
    }
}

impl<'d> uart::UartRx for SerialRx<'d> {
    type Error = Error;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.blocking_read(buf)
    }
}
