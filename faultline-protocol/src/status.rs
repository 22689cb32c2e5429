//! Status codes closing every command cycle
//!
//! Exactly one status emission follows a dispatch cycle. Protocol errors
//! (unknown command, length mismatch) and handler rejections share this
//! one reporting channel; nothing here is fatal to the loop.

/// Outcome of a command cycle, reported to the host as a single byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Command completed
    Ok,
    /// Command identifier (or sub-command pair) not registered
    UnknownCommand,
    /// Payload length differed from the registered fixed length, or a
    /// handler rejected a malformed payload
    LengthError,
    /// Glitch-loop counter finished on a value other than the expected
    /// total - a fault injection altered execution
    CountMismatch,
    /// Memory-read descriptor asked for more than the read window allows
    ReadTooLong,
    /// Memory-read descriptor carried an erase/program opcode
    DestructiveOp,
}

impl Status {
    /// Wire value of this status
    pub const fn code(self) -> u8 {
        match self {
            Status::Ok => 0x00,
            Status::UnknownCommand => 0x01,
            Status::LengthError => 0x04,
            Status::CountMismatch => 0x10,
            Status::ReadTooLong => 0x17,
            Status::DestructiveOp => 0x18,
        }
    }

    /// Parse a wire value back to a status (host-side use)
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::UnknownCommand),
            0x04 => Some(Status::LengthError),
            0x10 => Some(Status::CountMismatch),
            0x17 => Some(Status::ReadTooLong),
            0x18 => Some(Status::DestructiveOp),
            _ => None,
        }
    }

    /// Check for the success code
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        let all = [
            Status::Ok,
            Status::UnknownCommand,
            Status::LengthError,
            Status::CountMismatch,
            Status::ReadTooLong,
            Status::DestructiveOp,
        ];
        for status in all {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn test_unassigned_code() {
        assert_eq!(Status::from_code(0xFF), None);
    }

    #[test]
    fn test_is_ok() {
        assert!(Status::Ok.is_ok());
        assert!(!Status::LengthError.is_ok());
    }
}
