//! Protocol codec
//!
//! Tokenizes driver input into commands and writes responses.
//!
//! ## Input Grammar
//! ```text
//! input   := count command*
//! command := "insert" key value | "delete" key value | "find" key
//! ```
//! Tokens are separated by ASCII whitespace. Keys are single tokens taken
//! as raw bytes, so they need not be UTF-8; the count and values are
//! decimal.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{LogdexError, Result};
use super::{Command, CommandType, Response};

/// A token decoded from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A complete, well-formed command
    Command(Command),

    /// A token where a verb was expected but none matched; only that
    /// token was consumed
    UnknownVerb(String),
}

/// Reads the count and commands from a whitespace-separated token stream
pub struct CommandReader<R> {
    reader: R,

    /// Tokens of the current line not yet consumed
    pending: VecDeque<Vec<u8>>,

    /// Scratch line buffer
    line: Vec<u8>,
}

impl<R: BufRead> CommandReader<R> {
    /// Create a reader over buffered input
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line: Vec::new(),
        }
    }

    /// Read the leading command count
    ///
    /// `Ok(None)` on empty input.
    pub fn read_count(&mut self) -> Result<Option<usize>> {
        let token = match self.next_token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        parse_token::<usize>(&token).map(Some).ok_or_else(|| {
            LogdexError::Protocol(format!(
                "invalid command count: {:?}",
                String::from_utf8_lossy(&token)
            ))
        })
    }

    /// Read the next command
    ///
    /// `Ok(None)` when the input ends, including in the middle of a
    /// command's arguments.
    pub fn next_command(&mut self) -> Result<Option<Parsed>> {
        let verb = match self.next_token()? {
            Some(verb) => verb,
            None => return Ok(None),
        };

        let command_type = match parse_token::<CommandType>(&verb) {
            Some(command_type) => command_type,
            None => {
                return Ok(Some(Parsed::UnknownVerb(
                    String::from_utf8_lossy(&verb).into_owned(),
                )))
            }
        };

        let key = match self.next_token()? {
            Some(key) => key,
            None => return Ok(None),
        };

        let value = if command_type.takes_value() {
            match self.next_token()? {
                Some(token) => Some(parse_value(command_type, &token)?),
                None => return Ok(None),
            }
        } else {
            None
        };

        let command = match (command_type, value) {
            (CommandType::Insert, Some(value)) => Command::Insert { key, value },
            (CommandType::Delete, Some(value)) => Command::Delete { key, value },
            (CommandType::Find, _) => Command::Find { key },
            (command_type, None) => {
                return Err(LogdexError::Protocol(format!(
                    "{} command: missing value",
                    command_type
                )))
            }
        };

        Ok(Some(Parsed::Command(command)))
    }

    /// Next whitespace-separated token, pulling lines as needed
    fn next_token(&mut self) -> Result<Option<Vec<u8>>> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                self.line
                    .split(u8::is_ascii_whitespace)
                    .filter(|token| !token.is_empty())
                    .map(<[u8]>::to_vec),
            );
        }
        Ok(self.pending.pop_front())
    }
}

/// Parse a token that must be text; non-UTF-8 bytes never parse
fn parse_token<T: FromStr>(token: &[u8]) -> Option<T> {
    std::str::from_utf8(token).ok()?.parse().ok()
}

/// Parse a command's value argument
fn parse_value(command_type: CommandType, token: &[u8]) -> Result<i32> {
    parse_token::<i32>(token).ok_or_else(|| {
        LogdexError::Protocol(format!(
            "{} command: invalid value {:?}",
            command_type,
            String::from_utf8_lossy(token)
        ))
    })
}

/// Write a response as one line; responses without output write nothing
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    if response.has_output() {
        writeln!(writer, "{}", response)?;
    }
    Ok(())
}
