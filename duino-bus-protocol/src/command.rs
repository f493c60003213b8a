//! Command identifiers and their names
//!
//! Commands are plain bytes so devices can define their own alongside the
//! predefined ones. Names are only used for logging, through a
//! [`CommandNames`] lookup that calling code can extend.

use heapless::FnvIndexMap;

/// Checks to see if the device is alive
pub const PING: u8 = 0x01;

/// Name shown for commands nobody registered
pub const UNKNOWN_NAME: &str = "???";

/// Lookup from command byte to a human-readable name
pub trait CommandNames {
    /// Name of `cmd`, if known
    fn name(&self, cmd: u8) -> Option<&'static str>;

    /// Name of `cmd`, or `"???"`
    fn label(&self, cmd: u8) -> &'static str {
        self.name(cmd).unwrap_or(UNKNOWN_NAME)
    }
}

impl<T: CommandNames + ?Sized> CommandNames for &T {
    fn name(&self, cmd: u8) -> Option<&'static str> {
        (**self).name(cmd)
    }
}

/// The predefined commands every device understands
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCommands;

impl CommandNames for BaseCommands {
    fn name(&self, cmd: u8) -> Option<&'static str> {
        match cmd {
            PING => Some("PING"),
            _ => None,
        }
    }
}

/// Returned when a [`CommandRegistry`] has no room for another name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryFull;

/// Extendable command table
///
/// Starts out knowing the [`BaseCommands`]. `N` is the table size and
/// must be a power of two.
#[derive(Debug, Clone)]
pub struct CommandRegistry<const N: usize> {
    names: FnvIndexMap<u8, &'static str, N>,
}

impl<const N: usize> Default for CommandRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CommandRegistry<N> {
    /// Create a registry holding the base commands
    pub fn new() -> Self {
        let mut names = FnvIndexMap::new();
        let _ = names.insert(PING, "PING");
        Self { names }
    }

    /// Add or rename a command
    pub fn register(&mut self, cmd: u8, name: &'static str) -> Result<(), RegistryFull> {
        self.names
            .insert(cmd, name)
            .map(|_| ())
            .map_err(|_| RegistryFull)
    }

    /// Number of named commands
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no command is named
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<const N: usize> CommandNames for CommandRegistry<N> {
    fn name(&self, cmd: u8) -> Option<&'static str> {
        self.names.get(&cmd).copied()
    }
}
