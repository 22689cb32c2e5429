//! Password check handler
//!
//! Compares the payload against a stored secret byte by byte and stops
//! at the first mismatch. The early exit makes the response latency grow
//! with the length of the correct prefix - a classic timing side-channel,
//! left in deliberately so benches can practice recovering the secret
//! one byte at a time.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

/// Secret accepted by the stock command table
pub const DEFAULT_SECRET: &[u8] = b"touch";

#[derive(Debug, Clone, Copy)]
pub struct PasswordCheck {
    secret: &'static [u8],
}

impl PasswordCheck {
    pub fn new(secret: &'static [u8]) -> Self {
        Self { secret }
    }
}

/// Byte-by-byte comparison, short-circuiting on the first mismatch
///
/// Returns the match flag and how many secret bytes were examined; the
/// count is the measurable quantity the side-channel leaks.
fn check(payload: &[u8], secret: &[u8]) -> (bool, usize) {
    let mut compared = 0;
    for (i, &expect) in secret.iter().enumerate() {
        compared += 1;
        if payload.get(i) != Some(&expect) {
            return (false, compared);
        }
    }
    (true, compared)
}

impl Handler for PasswordCheck {
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
        ctx.trigger.assert();
        let (passok, _) = check(req.payload, self.secret);
        ctx.trigger.deassert();

        ctx.put(TAG_DATA, &[passok as u8])?;
        Ok(Status::Ok)
    }
}
