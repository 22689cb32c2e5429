//! Command handlers
//!
//! Each handler is one operation the target serves. Several are
//! deliberately vulnerable - that is the product: a bench target whose
//! weaknesses are known, so instrumentation and attacks can be
//! calibrated against them.
//!
//! A handler receives the decoded request and a [`Context`] carrying the
//! capabilities it may use (response channel, trigger line, LEDs, delay,
//! IAP memory). It emits zero or more data responses itself and returns
//! the status the engine reports to the host.

use embedded_hal::delay::DelayNs;

use faultline_hal::{IapMemory, OutputPin, StatusLeds, UartTx};
use faultline_protocol::commands::{
    CMD_BLINK, CMD_ECHO, CMD_GLITCH_COMPARISON, CMD_GLITCH_LOOP, CMD_INFINITE_LOOP,
    CMD_MEMORY_READ, CMD_PASSWORD, CMD_PASSWORD_V2, CMD_TRIM_READ, CMD_VERSION,
    SUB_GLITCH_COMPARISON, SUB_GLITCH_LOOP,
};
use faultline_protocol::{PayloadLen, Status, WireFormat};

use crate::context::Context;
use crate::registry::{CommandRegistry, RegistryError};

mod echo;
mod forever;
mod glitch;
mod memory;
mod password;
mod version;

pub use echo::Echo;
pub use forever::{Blink, InfiniteLoop};
pub use glitch::{GlitchComparison, GlitchLoop, COMPARISON_SENTINEL, EXPECTED_COUNT};
pub use memory::{MemoryRead, TrimRead, MAX_READ_LEN};
pub use password::{PasswordCheck, DEFAULT_SECRET};
pub use version::Version;

/// One decoded command, as delivered to a handler
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// Command identifier
    pub cmd: u8,
    /// Sub-command byte (`None` on V1 links)
    pub sub_cmd: Option<u8>,
    /// Payload bytes
    pub payload: &'a [u8],
}

/// The handler capability: execute one command
pub trait Handler {
    /// Run the command
    ///
    /// Returns the status byte closing the cycle, or a transport error
    /// if a data emission failed. The blink and infinite-loop handlers
    /// do not return under normal operation.
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
        M: IapMemory;
}

/// Handler instance stored in the registry, one variant per command
#[derive(Debug, Clone)]
pub enum CommandHandler {
    Echo(Echo),
    Password(PasswordCheck),
    GlitchLoop(GlitchLoop),
    GlitchComparison(GlitchComparison),
    MemoryRead(MemoryRead),
    TrimRead(TrimRead),
    Blink(Blink),
    InfiniteLoop(InfiniteLoop),
    Version(Version),
}

impl Handler for CommandHandler {
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
        match self {
            CommandHandler::Echo(h) => h.invoke(req, ctx),
            CommandHandler::Password(h) => h.invoke(req, ctx),
            CommandHandler::GlitchLoop(h) => h.invoke(req, ctx),
            CommandHandler::GlitchComparison(h) => h.invoke(req, ctx),
            CommandHandler::MemoryRead(h) => h.invoke(req, ctx),
            CommandHandler::TrimRead(h) => h.invoke(req, ctx),
            CommandHandler::Blink(h) => h.invoke(req, ctx),
            CommandHandler::InfiniteLoop(h) => h.invoke(req, ctx),
            CommandHandler::Version(h) => h.invoke(req, ctx),
        }
    }
}

/// Build the stock command table for a wire format
///
/// V1 registers every operation under its own identifier. V2 moves the
/// password check to 0x01 and folds the two glitch demonstrations under
/// one identifier selected by sub-command; echo becomes variable-length
/// since V2 frames carry an explicit length byte.
pub fn default_registry(
    format: WireFormat,
) -> Result<CommandRegistry<CommandHandler>, RegistryError> {
    let mut reg = CommandRegistry::new();
    match format {
        WireFormat::V1 => {
            reg.register(
                CMD_GLITCH_LOOP,
                PayloadLen::Fixed(0),
                CommandHandler::GlitchLoop(GlitchLoop),
            )?;
            reg.register(
                CMD_GLITCH_COMPARISON,
                PayloadLen::Fixed(1),
                CommandHandler::GlitchComparison(GlitchComparison),
            )?;
            reg.register(
                CMD_MEMORY_READ,
                PayloadLen::Fixed(4),
                CommandHandler::MemoryRead(MemoryRead),
            )?;
            reg.register(
                CMD_TRIM_READ,
                PayloadLen::Fixed(0),
                CommandHandler::TrimRead(TrimRead),
            )?;
            reg.register(CMD_ECHO, PayloadLen::Fixed(0), CommandHandler::Echo(Echo))?;
            reg.register(CMD_BLINK, PayloadLen::Fixed(0), CommandHandler::Blink(Blink))?;
            reg.register(
                CMD_PASSWORD,
                PayloadLen::Fixed(DEFAULT_SECRET.len() as u8),
                CommandHandler::Password(PasswordCheck::new(DEFAULT_SECRET)),
            )?;
            reg.register(
                CMD_INFINITE_LOOP,
                PayloadLen::Fixed(0),
                CommandHandler::InfiniteLoop(InfiniteLoop),
            )?;
            reg.register(
                CMD_VERSION,
                PayloadLen::Fixed(0),
                CommandHandler::Version(Version::new(format)),
            )?;
        }
        WireFormat::V2 => {
            reg.register_sub(
                CMD_GLITCH_LOOP,
                SUB_GLITCH_LOOP,
                PayloadLen::Fixed(0),
                CommandHandler::GlitchLoop(GlitchLoop),
            )?;
            reg.register_sub(
                CMD_GLITCH_LOOP,
                SUB_GLITCH_COMPARISON,
                PayloadLen::Fixed(1),
                CommandHandler::GlitchComparison(GlitchComparison),
            )?;
            reg.register(
                CMD_MEMORY_READ,
                PayloadLen::Fixed(4),
                CommandHandler::MemoryRead(MemoryRead),
            )?;
            reg.register(
                CMD_TRIM_READ,
                PayloadLen::Fixed(0),
                CommandHandler::TrimRead(TrimRead),
            )?;
            reg.register(CMD_ECHO, PayloadLen::Any, CommandHandler::Echo(Echo))?;
            reg.register(CMD_BLINK, PayloadLen::Fixed(0), CommandHandler::Blink(Blink))?;
            reg.register(
                CMD_PASSWORD_V2,
                PayloadLen::Fixed(DEFAULT_SECRET.len() as u8),
                CommandHandler::Password(PasswordCheck::new(DEFAULT_SECRET)),
            )?;
            reg.register(
                CMD_INFINITE_LOOP,
                PayloadLen::Fixed(0),
                CommandHandler::InfiniteLoop(InfiniteLoop),
            )?;
            reg.register(
                CMD_VERSION,
                PayloadLen::Fixed(0),
                CommandHandler::Version(Version::new(format)),
            )?;
        }
    }
    Ok(reg)
}
