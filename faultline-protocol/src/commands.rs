//! Default command identifiers
//!
//! Single-byte identifiers assigned by this firmware's default table.
//! Integrators are free to register their own; these are the values the
//! stock target answers to.

// V1 identifiers (also used in V2 unless noted)
pub const CMD_GLITCH_LOOP: u8 = b'g';
pub const CMD_GLITCH_COMPARISON: u8 = b'c';
pub const CMD_MEMORY_READ: u8 = b'n';
pub const CMD_TRIM_READ: u8 = b'x';
pub const CMD_ECHO: u8 = b'y';
pub const CMD_BLINK: u8 = b'b';
pub const CMD_PASSWORD: u8 = b'p';
pub const CMD_INFINITE_LOOP: u8 = b'i';
pub const CMD_VERSION: u8 = b'v';

/// V2 moves the password check off the printable range
pub const CMD_PASSWORD_V2: u8 = 0x01;

// In V2 the two glitch demonstrations share CMD_GLITCH_LOOP and are
// selected by sub-command
pub const SUB_GLITCH_LOOP: u8 = 0x00;
pub const SUB_GLITCH_COMPARISON: u8 = 0x01;
