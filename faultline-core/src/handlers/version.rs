//! Protocol version query
//!
//! Hosts probe this before anything else to confirm which wire format
//! the target speaks.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, WireFormat, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

#[derive(Debug, Clone, Copy)]
pub struct Version {
    version: u8,
}

impl Version {
    pub fn new(format: WireFormat) -> Self {
        Self {
            version: format.version_byte(),
        }
    }
}

impl Handler for Version {
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
        ctx.put(TAG_DATA, &[self.version])?;
        Ok(Status::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CaptureTx, FlatMemory, MockLeds, NoopDelay, RecordingPin};
    use crate::trigger::TriggerLine;

    #[test]
    fn test_reports_format_version() {
        let mut tx = CaptureTx::new();
        let mut trigger = TriggerLine::new(RecordingPin::new());
        let mut leds = MockLeds::new();
        let mut delay = NoopDelay;
        let mut memory = FlatMemory::new();

        let req = Request {
            cmd: b'v',
            sub_cmd: None,
            payload: &[],
        };
        let mut ctx = Context::new(&mut tx, &mut trigger, &mut leds, &mut delay, &mut memory);
        let status = Version::new(WireFormat::V2).invoke(&req, &mut ctx).unwrap();

        assert_eq!(status, Status::Ok);
        assert_eq!(&tx.written[..], &[TAG_DATA, 1, 3]);
    }
}
