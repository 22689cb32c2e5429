//! Frame decoding for the Faultline command protocol
//!
//! Incoming frames are parsed by a byte-at-a-time state machine so the
//! engine can suspend at the transport between bytes. `Ok(None)` from
//! [`FrameParser::feed`] means "frame not complete yet" - the
//! would-block case of a byte-synchronous decoder.
//!
//! The V1 format carries no length byte: the payload length is whatever
//! was registered for the command. The parser therefore asks a
//! [`LenResolver`] (in practice, the command registry) for the expected
//! length as soon as the command byte arrives. The V2 format declares its
//! own length and needs no resolver.

use heapless::Vec;

/// Maximum payload size in bytes, shared by frames and responses
pub const MAX_PAYLOAD_SIZE: usize = 249;

/// Wire format variant
///
/// Selected when the parser is constructed; a running link never mixes
/// formats. Kept as a runtime value (not a compile-time switch) so both
/// formats coexist in one build and both are testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireFormat {
    /// `[cmd][payload]` - length implied by registration
    V1,
    /// `[cmd][sub_cmd][len][payload]` - explicit length, sub-commands
    V2,
}

impl WireFormat {
    /// Protocol version byte reported by the version command
    pub const fn version_byte(self) -> u8 {
        match self {
            WireFormat::V1 => 1,
            WireFormat::V2 => 3,
        }
    }
}

/// Expected payload length registered for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadLen {
    /// Exactly this many bytes; the engine rejects anything else before
    /// the handler runs
    Fixed(u8),
    /// The handler performs its own length validation (V2 only; a V1
    /// frame for such a command carries no payload)
    Any,
}

/// Source of registered payload lengths, consulted during V1 decoding
pub trait LenResolver {
    /// Expected payload length for `cmd`, or `None` if unregistered
    fn payload_len(&self, cmd: u8) -> Option<PayloadLen>;
}

/// Errors that can occur during frame parsing or response encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// V1 command byte with no registration - the payload length is
    /// unknowable, so the frame cannot even be read off the wire
    UnknownCommand(u8),
    /// Declared or supplied payload exceeds [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A decoded command frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command identifier
    pub cmd: u8,
    /// Sub-command identifier (`None` on V1 frames)
    pub sub_cmd: Option<u8>,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame directly (host-side and test use)
    pub fn new(cmd: u8, sub_cmd: Option<u8>, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            cmd,
            sub_cmd,
            payload: payload_vec,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for the command byte
    AwaitCmd,
    /// V2: got CMD, waiting for SCMD
    AwaitSubCmd,
    /// V2: got SCMD, waiting for LEN
    AwaitLen,
    /// Reading payload bytes
    ReadingPayload,
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    format: WireFormat,
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_len: u8,
    cmd: u8,
    sub_cmd: u8,
}

impl FrameParser {
    /// Create a parser for the given wire format
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            state: ParseState::AwaitCmd,
            buffer: Vec::new(),
            expected_len: 0,
            cmd: 0,
            sub_cmd: 0,
        }
    }

    /// The wire format this parser was constructed for
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Reset the parser to await a fresh command byte
    pub fn reset(&mut self) {
        self.state = ParseState::AwaitCmd;
        self.buffer.clear();
        self.expected_len = 0;
        self.cmd = 0;
        self.sub_cmd = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete frame is assembled,
    /// `Ok(None)` when more bytes are needed, or `Err` on a protocol
    /// error (the parser resets itself and the next byte starts a new
    /// frame).
    pub fn feed<L: LenResolver>(
        &mut self,
        byte: u8,
        lens: &L,
    ) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::AwaitCmd => {
                self.cmd = byte;
                match self.format {
                    WireFormat::V1 => match lens.payload_len(byte) {
                        None => {
                            self.reset();
                            Err(FrameError::UnknownCommand(byte))
                        }
                        Some(PayloadLen::Fixed(n)) if n > 0 => {
                            self.expected_len = n;
                            self.buffer.clear();
                            self.state = ParseState::ReadingPayload;
                            Ok(None)
                        }
                        // Fixed(0) and Any both decode as an empty payload
                        // in V1 - there is no length on the wire to read
                        Some(_) => Ok(Some(self.complete())),
                    },
                    WireFormat::V2 => {
                        self.state = ParseState::AwaitSubCmd;
                        Ok(None)
                    }
                }
            }
            ParseState::AwaitSubCmd => {
                self.sub_cmd = byte;
                self.state = ParseState::AwaitLen;
                Ok(None)
            }
            ParseState::AwaitLen => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                if byte == 0 {
                    Ok(Some(self.complete()))
                } else {
                    self.expected_len = byte;
                    self.buffer.clear();
                    self.state = ParseState::ReadingPayload;
                    Ok(None)
                }
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: expected_len is bounded by MAX_PAYLOAD_SIZE
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_len as usize {
                    Ok(Some(self.complete()))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any. Remaining bytes
    /// after a complete frame are not consumed.
    pub fn feed_bytes<L: LenResolver>(
        &mut self,
        bytes: &[u8],
        lens: &L,
    ) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte, lens)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn complete(&mut self) -> Frame {
        let frame = Frame {
            cmd: self.cmd,
            sub_cmd: match self.format {
                WireFormat::V1 => None,
                WireFormat::V2 => Some(self.sub_cmd),
            },
            payload: self.buffer.clone(),
        };
        self.reset();
        frame
    }
}
