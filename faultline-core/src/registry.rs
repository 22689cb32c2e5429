//! Command registry
//!
//! A fixed table mapping command identifiers to their expected payload
//! length and handler. Filled exactly once before the dispatch loop
//! starts and read-only afterwards; the engine owns it for the life of
//! the device (which runs until reset).

use heapless::Vec;

use faultline_protocol::{LenResolver, PayloadLen};

/// Maximum number of registered commands
///
/// The table is scanned linearly on every dispatch; it stays small
/// enough that hashing would buy nothing.
pub const MAX_COMMANDS: usize = 16;

/// Errors from command registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// An entry with an overlapping (id, sub-id) space already exists.
    /// Duplicate registration is a configuration error and is rejected
    /// outright rather than silently shadowing.
    Duplicate { id: u8 },
    /// The table already holds [`MAX_COMMANDS`] entries
    TableFull,
}

/// One registered command
#[derive(Debug, Clone)]
pub struct CommandEntry<H> {
    /// Command identifier byte
    pub id: u8,
    /// Sub-command selector; `None` matches any sub-command
    pub sub_id: Option<u8>,
    /// Payload length contract checked before the handler runs
    pub expected: PayloadLen,
    /// The handler invoked for this command
    pub handler: H,
}

/// The command table
#[derive(Debug, Clone)]
pub struct CommandRegistry<H> {
    entries: Vec<CommandEntry<H>, MAX_COMMANDS>,
}

impl<H> Default for CommandRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> CommandRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a command matching any sub-command byte
    pub fn register(
        &mut self,
        id: u8,
        expected: PayloadLen,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.insert(id, None, expected, handler)
    }

    /// Register a command selected by an exact (id, sub-id) pair
    pub fn register_sub(
        &mut self,
        id: u8,
        sub_id: u8,
        expected: PayloadLen,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.insert(id, Some(sub_id), expected, handler)
    }

    fn insert(
        &mut self,
        id: u8,
        sub_id: Option<u8>,
        expected: PayloadLen,
        handler: H,
    ) -> Result<(), RegistryError> {
        // Two entries conflict when their (id, sub-id) spaces overlap:
        // same id with equal sub-ids, or same id where either side
        // matches any sub-command
        let conflict = self
            .entries
            .iter()
            .any(|e| e.id == id && (e.sub_id.is_none() || sub_id.is_none() || e.sub_id == sub_id));
        if conflict {
            return Err(RegistryError::Duplicate { id });
        }
        self.entries
            .push(CommandEntry {
                id,
                sub_id,
                expected,
                handler,
            })
            .map_err(|_| RegistryError::TableFull)
    }

    /// Find the entry for a decoded frame
    ///
    /// Linear scan in registration order. An entry registered without a
    /// sub-id matches regardless of the frame's sub-command byte.
    pub fn lookup(&self, id: u8, sub_id: Option<u8>) -> Option<&CommandEntry<H>> {
        self.entries
            .iter()
            .find(|e| e.id == id && Self::sub_matches(e.sub_id, sub_id))
    }

    /// Mutable variant of [`lookup`](Self::lookup), used by the engine
    /// to run the matched handler
    pub fn lookup_mut(&mut self, id: u8, sub_id: Option<u8>) -> Option<&mut CommandEntry<H>> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id && Self::sub_matches(e.sub_id, sub_id))
    }

    fn sub_matches(registered: Option<u8>, frame: Option<u8>) -> bool {
        match registered {
            None => true,
            Some(s) => frame == Some(s),
        }
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> LenResolver for CommandRegistry<H> {
    fn payload_len(&self, cmd: u8) -> Option<PayloadLen> {
        self.entries
            .iter()
            .find(|e| e.id == cmd)
            .map(|e| e.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register(b'y', PayloadLen::Any, 1).unwrap();
        reg.register(b'p', PayloadLen::Fixed(5), 2).unwrap();

        let entry = reg.lookup(b'p', None).unwrap();
        assert_eq!(entry.expected, PayloadLen::Fixed(5));
        assert_eq!(entry.handler, 2);

        assert!(reg.lookup(b'?', None).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register(b'y', PayloadLen::Any, 1).unwrap();
        assert_eq!(
            reg.register(b'y', PayloadLen::Fixed(1), 2),
            Err(RegistryError::Duplicate { id: b'y' })
        );
    }

    #[test]
    fn test_sub_id_conflicts_with_wildcard() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register(b'g', PayloadLen::Fixed(0), 1).unwrap();
        // A wildcard entry already claims every sub-command of 'g'
        assert_eq!(
            reg.register_sub(b'g', 0x01, PayloadLen::Fixed(1), 2),
            Err(RegistryError::Duplicate { id: b'g' })
        );
    }

    #[test]
    fn test_distinct_sub_ids_coexist() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register_sub(b'g', 0x00, PayloadLen::Fixed(0), 1).unwrap();
        reg.register_sub(b'g', 0x01, PayloadLen::Fixed(1), 2).unwrap();

        assert_eq!(reg.lookup(b'g', Some(0x00)).unwrap().handler, 1);
        assert_eq!(reg.lookup(b'g', Some(0x01)).unwrap().handler, 2);
        assert!(reg.lookup(b'g', Some(0x02)).is_none());
        // Duplicate of an existing pair still rejected
        assert_eq!(
            reg.register_sub(b'g', 0x00, PayloadLen::Fixed(0), 3),
            Err(RegistryError::Duplicate { id: b'g' })
        );
    }

    #[test]
    fn test_wildcard_sub_matches_any_frame() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register(b'y', PayloadLen::Any, 1).unwrap();
        assert!(reg.lookup(b'y', None).is_some());
        assert!(reg.lookup(b'y', Some(0x42)).is_some());
    }

    #[test]
    fn test_table_full() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        for id in 0..MAX_COMMANDS as u8 {
            reg.register(id, PayloadLen::Fixed(0), id).unwrap();
        }
        assert_eq!(
            reg.register(0xFF, PayloadLen::Fixed(0), 0),
            Err(RegistryError::TableFull)
        );
    }

    #[test]
    fn test_len_resolver() {
        let mut reg: CommandRegistry<u8> = CommandRegistry::new();
        reg.register(b'p', PayloadLen::Fixed(5), 1).unwrap();
        assert_eq!(reg.payload_len(b'p'), Some(PayloadLen::Fixed(5)));
        assert_eq!(reg.payload_len(b'?'), None);
    }
}
