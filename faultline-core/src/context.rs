//! Handler execution context
//!
//! Everything a handler may touch during one dispatch cycle: the
//! response channel, the trigger line, the indicator LEDs, a delay
//! provider, and the IAP memory interface. The engine builds one of
//! these per invocation from the resources it owns; handlers never see
//! the transport's receive side or the registry.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Response, Status, MAX_RESPONSE_SIZE};

use crate::trigger::TriggerLine;

/// Per-invocation handler capabilities
pub struct Context<'a, T, P, S, D, M>
where
    T: UartTx,
    P: OutputPin,
    S: StatusLeds,
    D: DelayNs,
    M: IapMemory,
{
    tx: &'a mut T,
    /// The external trigger line
    pub trigger: &'a mut TriggerLine<P>,
    /// Indicator LEDs
    pub leds: &'a mut S,
    /// Delay provider for handlers that pace themselves
    pub delay: &'a mut D,
    /// Raw device memory access
    pub memory: &'a mut M,
}

impl<'a, T, P, S, D, M> Context<'a, T, P, S, D, M>
where
    T: UartTx,
    P: OutputPin,
    S: StatusLeds,
    D: DelayNs,
    M: IapMemory,
{
    /// Assemble a context from the engine's resources
    pub fn new(
        tx: &'a mut T,
        trigger: &'a mut TriggerLine<P>,
        leds: &'a mut S,
        delay: &'a mut D,
        memory: &'a mut M,
    ) -> Self {
        Self {
            tx,
            trigger,
            leds,
            delay,
            memory,
        }
    }

    /// Emit one tagged response
    ///
    /// Handlers call this for each data emission before returning their
    /// status; the engine closes the cycle with the status emission.
    pub fn put(&mut self, tag: u8, data: &[u8]) -> Result<(), T::Error> {
        write_emission(self.tx, tag, data)
    }
}

/// Encode and transmit one `[tag][len][data]` emission
pub(crate) fn write_emission<T: UartTx>(tx: &mut T, tag: u8, data: &[u8]) -> Result<(), T::Error> {
    // Handler payloads are bounded by MAX_PAYLOAD_SIZE at every source
    debug_assert!(data.len() <= faultline_protocol::MAX_PAYLOAD_SIZE);
    let mut buffer = [0u8; MAX_RESPONSE_SIZE];
    if let Ok(resp) = Response::new(tag, data) {
        // Cannot fail: the buffer fits any well-formed emission
        if let Ok(len) = resp.encode(&mut buffer) {
            tx.write_blocking(&buffer[..len])?;
            tx.flush()?;
        }
    }
    Ok(())
}

/// Transmit the terminal status emission for a cycle
pub(crate) fn send_status<T: UartTx>(tx: &mut T, status: Status) -> Result<(), T::Error> {
    let resp = Response::status(status);
    let mut buffer = [0u8; MAX_RESPONSE_SIZE];
    // Cannot fail: a status emission is three bytes
    if let Ok(len) = resp.encode(&mut buffer) {
        tx.write_blocking(&buffer[..len])?;
        tx.flush()?;
    }
    Ok(())
}
