//! Asterisk AGI channel
//!
//! The switch launches the hook as a child process and speaks the AGI
//! protocol over its pipes: a block of `agi_*: value` header lines ending at
//! the first blank line, then one command per line, each acknowledged with a
//! `200 result=...` status line.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use tracing::debug;

/// Verbosity level used for screening diagnostics.
const VERBOSE_LEVEL: u8 = 1;

/// A live AGI session. Generic over its transport so tests can drive it
/// with in-memory buffers.
pub struct AgiChannel<R, W> {
    reader: R,
    writer: W,
    environment: HashMap<String, String>,
}

impl<R: BufRead, W: Write> AgiChannel<R, W> {
    /// Open the channel by consuming the environment block from the switch.
    pub fn open(mut reader: R, writer: W) -> io::Result<Self> {
        let environment = read_environment(&mut reader)?;
        debug!(variables = environment.len(), "AGI environment received");

        Ok(Self {
            reader,
            writer,
            environment,
        })
    }

    /// Call attributes the switch exposed for this invocation.
    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    /// Emit a diagnostic message on the switch console.
    pub fn verbose(&mut self, message: &str) -> io::Result<()> {
        // A double quote would end the command argument early.
        let message = message.replace('"', "'");
        self.execute(&format!("VERBOSE \"{}\" {}", message, VERBOSE_LEVEL))
    }

    /// Ask the switch to terminate the current call.
    pub fn hangup(&mut self) -> io::Result<()> {
        self.execute("HANGUP")
    }

    fn execute(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.writer, "{command}")?;
        self.writer.flush()?;

        // Drain the status line; the switch may already be gone on hangup.
        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? > 0 {
            debug!(command, reply = reply.trim(), "AGI command acknowledged");
        }
        Ok(())
    }
}

fn read_environment<R: BufRead>(reader: &mut R) -> io::Result<HashMap<String, String>> {
    let mut environment = HashMap::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            environment.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(environment)
}
