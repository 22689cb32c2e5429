//! Response encoding for the Faultline command protocol
//!
//! Every emission from the target is `[tag][len][data]`. A handler may
//! produce zero or more data emissions; the engine then closes the cycle
//! with exactly one status emission carrying a [`Status`] code byte.

use heapless::Vec;

use crate::frame::{FrameError, MAX_PAYLOAD_SIZE};
use crate::status::Status;

/// Type tag for response data emissions
pub const TAG_DATA: u8 = b'r';

/// Type tag for the terminal status emission
pub const TAG_STATUS: u8 = b'z';

/// Maximum complete emission size (TAG + LEN + MAX_PAYLOAD)
pub const MAX_RESPONSE_SIZE: usize = 2 + MAX_PAYLOAD_SIZE;

/// A single tagged emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Type tag
    pub tag: u8,
    /// Emission data
    pub data: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Response {
    /// Create an emission with the given tag and data
    pub fn new(tag: u8, data: &[u8]) -> Result<Self, FrameError> {
        let mut data_vec = Vec::new();
        data_vec
            .extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { tag, data: data_vec })
    }

    /// Create the terminal status emission for a cycle
    pub fn status(status: Status) -> Self {
        let mut data = Vec::new();
        // Cannot overflow: a status is a single byte
        let _ = data.push(status.code());
        Self {
            tag: TAG_STATUS,
            data,
        }
    }

    /// Encode this emission into a byte buffer
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let total = 2 + self.data.len();
        if buffer.len() < total {
            return Err(FrameError::BufferTooSmall);
        }
        buffer[0] = self.tag;
        buffer[1] = self.data.len() as u8;
        buffer[2..total].copy_from_slice(&self.data);
        Ok(total)
    }

    /// Encode this emission into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_RESPONSE_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_RESPONSE_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Decode one emission from the front of `bytes`
    ///
    /// Returns the emission and the number of bytes consumed, or
    /// `Ok(None)` if `bytes` does not yet hold a complete emission.
    /// Host-side tooling and tests use this to walk a captured stream.
    pub fn decode(bytes: &[u8]) -> Result<Option<(Self, usize)>, FrameError> {
        if bytes.len() < 2 {
            return Ok(None);
        }
        let len = bytes[1] as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        if bytes.len() < 2 + len {
            return Ok(None);
        }
        let resp = Self::new(bytes[0], &bytes[2..2 + len])?;
        Ok(Some((resp, 2 + len)))
    }
}
