//! Glitch characterization handlers
//!
//! Two trigger-bracketed operations used to calibrate fault injection:
//! a nested counting loop whose final total reveals skipped iterations,
//! and a single branch whose outcome reveals a corrupted comparison.
//! Both assert the trigger immediately before the operation and deassert
//! immediately after, with nothing else inside the window.

use core::hint::black_box;

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

/// Loop bound of each nesting level
const LOOP_DIM: u32 = 50;

/// Counter value an undisturbed run always reaches
pub const EXPECTED_COUNT: u32 = LOOP_DIM * LOOP_DIM;

/// Byte the comparison handler tests against
pub const COMPARISON_SENTINEL: u8 = 0xA2;

/// Fixed-iteration nested counting loop
///
/// Emits the 4-byte little-endian counter; the status reports whether a
/// fault altered the count.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlitchLoop;

impl Handler for GlitchLoop {
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
        let mut cnt: u32 = 0;

        ctx.trigger.assert();
        // black_box pins every increment; the loop must execute all
        // 2500 steps for real so a glitch has instructions to corrupt
        for _ in 0..LOOP_DIM {
            for _ in 0..LOOP_DIM {
                cnt = black_box(cnt) + 1;
            }
        }
        ctx.trigger.deassert();

        ctx.put(TAG_DATA, &cnt.to_le_bytes())?;
        if cnt != EXPECTED_COUNT {
            Ok(Status::CountMismatch)
        } else {
            Ok(Status::Ok)
        }
    }
}

/// Single guarded comparison
///
/// Emits 1 if the payload byte equals the sentinel, 0 otherwise. A
/// successful glitch flips the reported branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlitchComparison;

impl Handler for GlitchComparison {
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
        let Some(&input) = req.payload.first() else {
            return Ok(Status::LengthError);
        };

        let ok: u8;
        ctx.trigger.assert();
        if black_box(input) == COMPARISON_SENTINEL {
            ok = 1;
        } else {
            ok = 0;
        }
        ctx.trigger.deassert();

        ctx.put(TAG_DATA, &[ok])?;
        Ok(Status::Ok)
    }
}
