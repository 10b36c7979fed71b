//! Command definitions
//!
//! Represents commands read from the driver's input.

use std::fmt;
use std::str::FromStr;

/// Command types, one per verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Insert,
    Delete,
    Find,
}

impl CommandType {
    /// The verb as written in the input
    pub fn verb(&self) -> &'static str {
        match self {
            CommandType::Insert => "insert",
            CommandType::Delete => "delete",
            CommandType::Find => "find",
        }
    }

    /// Whether the verb takes a value argument after the key
    pub fn takes_value(&self) -> bool {
        !matches!(self, CommandType::Find)
    }
}

impl FromStr for CommandType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(CommandType::Insert),
            "delete" => Ok(CommandType::Delete),
            "find" => Ok(CommandType::Find),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Associate a value with a key
    Insert { key: Vec<u8>, value: i32 },

    /// Remove a value from a key
    Delete { key: Vec<u8>, value: i32 },

    /// List a key's values
    Find { key: Vec<u8> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Insert { .. } => CommandType::Insert,
            Command::Delete { .. } => CommandType::Delete,
            Command::Find { .. } => CommandType::Find,
        }
    }

    /// The key this command addresses
    pub fn key(&self) -> &[u8] {
        match self {
            Command::Insert { key, .. } | Command::Delete { key, .. } | Command::Find { key } => key,
        }
    }
}
