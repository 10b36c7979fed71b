//! Command Driver
//!
//! Runs a batch of text commands against an engine.

use std::io::{BufRead, Write};

use crate::engine::Engine;
use crate::error::Result;
use crate::log::LogStorage;
use crate::protocol::{write_response, Command, CommandReader, Parsed, Response};

/// Counters for one driver run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Count announced at the start of the input
    pub announced: usize,

    /// Commands executed against the engine
    pub executed: usize,

    /// Commands skipped (unknown verb or rejected by the engine)
    pub skipped: usize,

    /// Output lines written
    pub lines_written: usize,
}

/// Handles a single batch of commands
pub struct Session<'e, S: LogStorage, R, W> {
    /// Command source
    reader: CommandReader<R>,

    /// Response sink
    writer: W,

    /// Engine the commands run against
    engine: &'e mut Engine<S>,
}

impl<'e, S: LogStorage, R: BufRead, W: Write> Session<'e, S, R, W> {
    /// Create a new session
    pub fn new(engine: &'e mut Engine<S>, input: R, output: W) -> Self {
        Self {
            reader: CommandReader::new(input),
            writer: output,
            engine,
        }
    }

    /// Run the batch (blocking until the input is exhausted)
    ///
    /// Reads the count, then up to that many commands. Input that ends early
    /// stops the run without error. Unknown verbs and commands the engine
    /// rejects are skipped; fatal engine errors abort the run.
    pub fn run(&mut self) -> Result<SessionStats> {
        let mut stats = SessionStats::default();

        let count = match self.reader.read_count()? {
            Some(count) => count,
            None => {
                tracing::debug!("empty input");
                return Ok(stats);
            }
        };
        stats.announced = count;

        for n in 0..count {
            let command = match self.reader.next_command()? {
                Some(Parsed::Command(command)) => command,
                Some(Parsed::UnknownVerb(verb)) => {
                    tracing::warn!(verb = %verb, "skipping unknown command");
                    stats.skipped += 1;
                    continue;
                }
                None => {
                    tracing::warn!("input ended after {} of {} commands", n, count);
                    break;
                }
            };

            tracing::trace!("executing {:?}", command);

            let response = match self.execute_command(command) {
                Ok(response) => response,
                Err(e) if !e.is_fatal() => {
                    tracing::warn!("command rejected: {}", e);
                    stats.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("fatal engine error: {}", e);
                    let _ = self.writer.flush();
                    return Err(e);
                }
            };
            stats.executed += 1;

            if response.has_output() {
                write_response(&mut self.writer, &response)?;
                stats.lines_written += 1;
            }
        }

        self.writer.flush()?;
        Ok(stats)
    }

    /// Execute a command and return a response
    fn execute_command(&mut self, command: Command) -> Result<Response> {
        self.engine.execute(command)
    }

    /// Give the output sink back
    pub fn into_writer(self) -> W {
        self.writer
    }
}
