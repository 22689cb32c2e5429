//! Intentionally non-terminating handlers
//!
//! These two commands never return under normal operation; dispatching
//! one parks the engine forever, and only an external reset or a
//! successful fault injection gets the device back. That is their
//! purpose: the infinite-loop handler exists so a bench can prove its
//! glitcher breaks real control flow. Test harnesses must run them
//! inside a bounded execution context (a killable thread), never through
//! the production loop.

use core::hint::black_box;

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

/// Half-period of the blink pattern in milliseconds
const BLINK_HALF_PERIOD_MS: u32 = 500;

/// Emitted by the infinite-loop handler if execution escapes the spin
const BREAKOUT_MARKER: &[u8] = b"BREAKOUT";

/// Visual liveness indicator: blinks the ok LED forever
///
/// Never returns. The blink rate doubles as a crude clock check - the
/// period scales with whatever the core clock actually is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blink;

impl Handler for Blink {
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
        loop {
            ctx.leds.set_ok(true);
            ctx.delay.delay_ms(BLINK_HALF_PERIOD_MS);
            ctx.leds.set_ok(false);
            ctx.delay.delay_ms(BLINK_HALF_PERIOD_MS);
        }
    }
}

/// Glitch breakout demonstration
///
/// Pulses the trigger as a reference edge, then spins on a comparison
/// that can never become true. The code after the spin is reachable
/// only when a fault injection corrupts the loop condition; reaching it
/// emits a diagnostic marker the host watches for.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteLoop;

impl Handler for InfiniteLoop {
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
        ctx.leds.set_ok(true);
        ctx.leds.set_error(false);

        // Reference edge for the glitcher to time against
        ctx.trigger.assert();
        ctx.trigger.deassert();

        // black_box keeps the comparison in the instruction stream; the
        // spin must be a real load-compare-branch for a glitch to skip
        let escape: u8 = 0;
        while black_box(escape) != 2 {}

        ctx.leds.set_error(true);
        ctx.put(TAG_DATA, BREAKOUT_MARKER)?;
        Ok(Status::Ok)
    }
}
