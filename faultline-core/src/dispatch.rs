//! Dispatch engine
//!
//! The single control loop of the target. Each cycle decodes one frame
//! from the transport, validates it against the registry, runs the
//! matching handler, and closes with a status emission. Protocol errors
//! are reported and the loop continues; only transport failures
//! surface, and only the two intentionally non-terminating handlers
//! stop the loop for good.
//!
//! The engine owns every resource it dispatches over - registry,
//! transport halves, trigger line, LEDs, delay, IAP memory - all
//! injected at construction. There is no ambient state.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartRx, UartTx};
use faultline_protocol::{
    FrameError, FrameParser, PayloadLen, Status, WireFormat, RESET_BANNER,
};

use crate::context::{send_status, Context};
use crate::handlers::{CommandHandler, Handler, Request};
use crate::registry::CommandRegistry;
use crate::trigger::TriggerLine;

/// Transport failure that stopped the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError<RxE, TxE> {
    /// Receive side failed
    Rx(RxE),
    /// Transmit side failed
    Tx(TxE),
}

/// The command dispatch engine
pub struct Engine<R, T, P, S, D, M>
where
    R: UartRx,
    T: UartTx,
    P: OutputPin,
    S: StatusLeds,
    D: DelayNs,
    M: IapMemory,
{
    rx: R,
    tx: T,
    parser: FrameParser,
    registry: CommandRegistry<CommandHandler>,
    trigger: TriggerLine<P>,
    leds: S,
    delay: D,
    memory: M,
}

impl<R, T, P, S, D, M> Engine<R, T, P, S, D, M>
where
    R: UartRx,
    T: UartTx,
    P: OutputPin,
    S: StatusLeds,
    D: DelayNs,
    M: IapMemory,
{
    /// Build an engine over its injected resources
    ///
    /// The trigger pin is driven to the deasserted state immediately.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rx: R,
        tx: T,
        format: WireFormat,
        registry: CommandRegistry<CommandHandler>,
        trigger_pin: P,
        leds: S,
        delay: D,
        memory: M,
    ) -> Self {
        Self {
            rx,
            tx,
            parser: FrameParser::new(format),
            registry,
            trigger: TriggerLine::new(trigger_pin),
            leds,
            delay,
            memory,
        }
    }

    /// Emit the reset banner
    ///
    /// Called once after boot, before the first [`poll`](Self::poll).
    pub fn announce_reset(&mut self) -> Result<(), T::Error> {
        self.tx.write_blocking(RESET_BANNER)?;
        self.tx.flush()
    }

    /// Run one dispatch cycle: decode a frame, dispatch it, report
    ///
    /// Suspends at the transport until a full frame has arrived.
    /// Protocol errors are reported to the host in-band and still
    /// return `Ok`; only transport failures return `Err`.
    pub fn poll(&mut self) -> Result<(), EngineError<R::Error, T::Error>> {
        let frame = loop {
            let byte = self.rx.read_byte().map_err(EngineError::Rx)?;
            match self.parser.feed(byte, &self.registry) {
                Ok(Some(frame)) => break frame,
                Ok(None) => continue,
                Err(FrameError::UnknownCommand(_)) => {
                    send_status(&mut self.tx, Status::UnknownCommand).map_err(EngineError::Tx)?;
                }
                Err(_) => {
                    // Oversize declared length; the parser has resynced
                    send_status(&mut self.tx, Status::LengthError).map_err(EngineError::Tx)?;
                }
            }
        };

        let Some(entry) = self.registry.lookup_mut(frame.cmd, frame.sub_cmd) else {
            send_status(&mut self.tx, Status::UnknownCommand).map_err(EngineError::Tx)?;
            return Ok(());
        };

        // Fixed-length commands never reach their handler with a
        // mismatched payload
        if let PayloadLen::Fixed(expected) = entry.expected {
            if frame.payload.len() != expected as usize {
                send_status(&mut self.tx, Status::LengthError).map_err(EngineError::Tx)?;
                return Ok(());
            }
        }

        let req = Request {
            cmd: frame.cmd,
            sub_cmd: frame.sub_cmd,
            payload: &frame.payload,
        };
        let mut ctx = Context::new(
            &mut self.tx,
            &mut self.trigger,
            &mut self.leds,
            &mut self.delay,
            &mut self.memory,
        );
        let status = entry.handler.invoke(&req, &mut ctx).map_err(EngineError::Tx)?;

        send_status(&mut self.tx, status).map_err(EngineError::Tx)?;
        Ok(())
    }

    /// Dispatch cycles until the transport fails
    ///
    /// Never returns while the link is healthy. A dispatched handler
    /// that never returns (blink, infinite-loop) parks the loop here
    /// forever - the intended terminal state for those commands.
    pub fn run(&mut self) -> EngineError<R::Error, T::Error> {
        loop {
            if let Err(e) = self.poll() {
                return e;
            }
        }
    }

    /// The command table
    pub fn registry(&self) -> &CommandRegistry<CommandHandler> {
        &self.registry
    }

    /// The trigger line
    pub fn trigger(&self) -> &TriggerLine<P> {
        &self.trigger
    }

    /// The transmit half (tests inspect captured output through this)
    pub fn tx(&self) -> &T {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{default_registry, Echo};
    use crate::mock::{CaptureTx, FlatMemory, MockLeds, NoopDelay, RecordingPin, RxExhausted, ScriptedRx};
    use faultline_protocol::commands::{CMD_GLITCH_LOOP, SUB_GLITCH_COMPARISON};
    use faultline_protocol::{TAG_DATA, TAG_STATUS};

    type TestEngine = Engine<ScriptedRx, CaptureTx, RecordingPin, MockLeds, NoopDelay, FlatMemory>;

    fn engine(
        format: WireFormat,
        registry: CommandRegistry<CommandHandler>,
        script: &[u8],
    ) -> TestEngine {
        Engine::new(
            ScriptedRx::new(script),
            CaptureTx::new(),
            format,
            registry,
            RecordingPin::new(),
            MockLeds::new(),
            NoopDelay,
            FlatMemory::new(),
        )
    }

    /// Poll until the scripted stream runs dry
    fn drain(engine: &mut TestEngine) {
        loop {
            match engine.poll() {
                Ok(()) => continue,
                Err(EngineError::Rx(RxExhausted)) => break,
                Err(e) => panic!("unexpected engine error: {:?}", e),
            }
        }
    }

    #[test]
    fn test_v1_echo_end_to_end() {
        // Echo registered at a fixed 3-byte length for the V1 link
        let mut registry = CommandRegistry::new();
        registry
            .register(b'y', PayloadLen::Fixed(3), CommandHandler::Echo(Echo))
            .unwrap();

        let mut engine = engine(WireFormat::V1, registry, &[b'y', 0x41, 0x42, 0x43]);
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[
                TAG_DATA, 3, 0x41, 0x42, 0x43, //
                TAG_STATUS, 1, Status::Ok.code(),
            ]
        );
    }

    #[test]
    fn test_v1_password_accept_and_reject() {
        let registry = default_registry(WireFormat::V1).unwrap();
        let mut engine = engine(WireFormat::V1, registry, b"ptouchpxouch");
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[
                TAG_DATA, 1, 0x01, TAG_STATUS, 1, Status::Ok.code(), //
                TAG_DATA, 1, 0x00, TAG_STATUS, 1, Status::Ok.code(),
            ]
        );
    }

    #[test]
    fn test_v1_memory_read_destructive_rejected() {
        let registry = default_registry(WireFormat::V1).unwrap();
        // Opcode 0x20 carries the erase/program bit
        let mut engine = engine(WireFormat::V1, registry, &[b'n', 0x20, 0x00, 0x00, 0x04]);
        drain(&mut engine);

        // Rejection status only - no data frame was emitted
        assert_eq!(
            &engine.tx().written[..],
            &[TAG_STATUS, 1, Status::DestructiveOp.code()]
        );
    }

    #[test]
    fn test_v1_unknown_command_reported_and_loop_continues() {
        let registry = default_registry(WireFormat::V1).unwrap();
        let mut engine = engine(WireFormat::V1, registry, &[b'?', b'v']);
        assert_eq!(engine.registry().len(), 9);
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[
                TAG_STATUS, 1, Status::UnknownCommand.code(), //
                TAG_DATA, 1, 1, TAG_STATUS, 1, Status::Ok.code(),
            ]
        );
    }

    #[test]
    fn test_v2_echo_variable_length() {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = engine(
            WireFormat::V2,
            registry,
            &[b'y', 0x00, 3, 0x41, 0x42, 0x43],
        );
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[
                TAG_DATA, 3, 0x41, 0x42, 0x43, //
                TAG_STATUS, 1, Status::Ok.code(),
            ]
        );
    }

    #[test]
    fn test_v2_length_mismatch_skips_handler() {
        let registry = default_registry(WireFormat::V2).unwrap();
        // Password expects 5 bytes; send 4
        let mut engine = engine(
            WireFormat::V2,
            registry,
            &[0x01, 0x00, 4, b't', b'o', b'u', b'c'],
        );
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[TAG_STATUS, 1, Status::LengthError.code()]
        );
        // The handler never ran: no trigger window was opened
        assert_eq!(engine.trigger().pin().rises, 0);
    }

    #[test]
    fn test_v2_unknown_command() {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = engine(WireFormat::V2, registry, &[b'?', 0x00, 0]);
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[TAG_STATUS, 1, Status::UnknownCommand.code()]
        );
    }

    #[test]
    fn test_v2_unknown_sub_command() {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = engine(WireFormat::V2, registry, &[CMD_GLITCH_LOOP, 0x07, 0]);
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[TAG_STATUS, 1, Status::UnknownCommand.code()]
        );
    }

    #[test]
    fn test_v2_glitch_comparison_by_sub_command() {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = engine(
            WireFormat::V2,
            registry,
            &[CMD_GLITCH_LOOP, SUB_GLITCH_COMPARISON, 1, 0xA2],
        );
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[TAG_DATA, 1, 1, TAG_STATUS, 1, Status::Ok.code()]
        );
        assert_eq!(engine.trigger().pin().rises, 1);
        assert_eq!(engine.trigger().pin().falls, 1);
    }

    #[test]
    fn test_v2_oversize_declared_length() {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = engine(WireFormat::V2, registry, &[b'y', 0x00, 250, b'g', 0x00, 0]);
        drain(&mut engine);

        // Oversize frame reported, then the glitch-loop frame after it
        // still dispatched
        let written = &engine.tx().written;
        assert_eq!(&written[..3], &[TAG_STATUS, 1, Status::LengthError.code()]);
        assert_eq!(written[3], TAG_DATA);
        assert_eq!(written[4], 4); // 4-byte counter emission follows
    }

    #[test]
    fn test_glitch_loop_full_cycle() {
        let registry = default_registry(WireFormat::V1).unwrap();
        let mut engine = engine(WireFormat::V1, registry, &[b'g']);
        drain(&mut engine);

        assert_eq!(
            &engine.tx().written[..],
            &[
                TAG_DATA, 4, 0xC4, 0x09, 0x00, 0x00, //
                TAG_STATUS, 1, Status::Ok.code(),
            ]
        );
    }

    #[test]
    fn test_announce_reset() {
        let registry = default_registry(WireFormat::V1).unwrap();
        let mut engine = engine(WireFormat::V1, registry, &[]);
        engine.announce_reset().unwrap();
        assert_eq!(&engine.tx().written[..], RESET_BANNER);
    }

    #[test]
    fn test_run_returns_transport_error() {
        let registry = default_registry(WireFormat::V1).unwrap();
        let mut engine = engine(WireFormat::V1, registry, &[b'v']);
        assert_eq!(engine.run(), EngineError::Rx(RxExhausted));
        // The scripted frame was still served before the stream dried up
        assert_eq!(engine.tx().written[0], TAG_DATA);
    }
}
