//! Echo handler
//!
//! Loopback diagnostic: emits the request payload unchanged. Hosts use
//! it to verify the serial path and baud settings before arming anything.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::{Status, TAG_DATA};

use crate::context::Context;
use crate::handlers::{Handler, Request};

#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Handler for Echo {
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
        ctx.put(TAG_DATA, req.payload)?;
        Ok(Status::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CaptureTx, FlatMemory, MockLeds, NoopDelay, RecordingPin};
    use crate::trigger::TriggerLine;
    use faultline_protocol::Response;

    #[test]
    fn test_echo_roundtrip() {
        let mut tx = CaptureTx::new();
        let mut trigger = TriggerLine::new(RecordingPin::new());
        let mut leds = MockLeds::new();
        let mut delay = NoopDelay;
        let mut memory = FlatMemory::new();

        let payload = [0x41, 0x42, 0x43];
        let req = Request {
            cmd: b'y',
            sub_cmd: None,
            payload: &payload,
        };
        let mut ctx = Context::new(&mut tx, &mut trigger, &mut leds, &mut delay, &mut memory);
        let status = Echo.invoke(&req, &mut ctx).unwrap();

        assert_eq!(status, Status::Ok);
        let (resp, _) = Response::decode(&tx.written).unwrap().unwrap();
        assert_eq!(resp.tag, TAG_DATA);
        assert_eq!(&resp.data[..], &payload);
    }

    #[test]
    fn test_echo_max_length_payload() {
        let mut tx = CaptureTx::new();
        let mut trigger = TriggerLine::new(RecordingPin::new());
        let mut leds = MockLeds::new();
        let mut delay = NoopDelay;
        let mut memory = FlatMemory::new();

        let payload = [0xAB; faultline_protocol::MAX_PAYLOAD_SIZE];
        let req = Request {
            cmd: b'y',
            sub_cmd: None,
            payload: &payload,
        };
        let mut ctx = Context::new(&mut tx, &mut trigger, &mut leds, &mut delay, &mut memory);
        let status = Echo.invoke(&req, &mut ctx).unwrap();

        assert_eq!(status, Status::Ok);
        let (resp, _) = Response::decode(&tx.written).unwrap().unwrap();
        assert_eq!(&resp.data[..], &payload[..]);
    }

    #[test]
    fn test_echo_empty_payload() {
        let mut tx = CaptureTx::new();
        let mut trigger = TriggerLine::new(RecordingPin::new());
        let mut leds = MockLeds::new();
        let mut delay = NoopDelay;
        let mut memory = FlatMemory::new();

        let req = Request {
            cmd: b'y',
            sub_cmd: None,
            payload: &[],
        };
        let mut ctx = Context::new(&mut tx, &mut trigger, &mut leds, &mut delay, &mut memory);
        let status = Echo.invoke(&req, &mut ctx).unwrap();

        assert_eq!(status, Status::Ok);
        assert_eq!(&tx.written[..], &[TAG_DATA, 0]);
    }
}
