//! Response definitions
//!
//! Represents the output of a command.

use std::fmt;

/// Output produced by one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// No output (insert, delete)
    Empty,

    /// Ascending values of a key
    Values(Vec<i32>),

    /// The key holds no values
    Null,
}

impl Response {
    /// Response to a find, `Null` when there is nothing to report
    pub fn from_values(values: Vec<i32>) -> Self {
        if values.is_empty() {
            Response::Null
        } else {
            Response::Values(values)
        }
    }

    /// Whether this response prints a line
    pub fn has_output(&self) -> bool {
        !matches!(self, Response::Empty)
    }
}

/// Renders the output line without its trailing newline
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Empty => Ok(()),
            Response::Null => f.write_str("null"),
            Response::Values(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}
