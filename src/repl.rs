//! Line-oriented command loop.
//!
//! Understands `get <key>`, `put <key> <value...>` and `exit`. The value of a
//! `put` is the rest of the line and may contain spaces.

use crate::database::Database;
use anyhow::{Context, Result};
use log::error;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { key: String },
    Put { key: String, value: String },
    Exit,
    Empty,
    /// `put` with a key but no value
    MissingValue,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.starts_with("exit") {
            Command::Exit
        } else if let Some(key) = line.strip_prefix("get ") {
            Command::Get {
                key: key.to_string(),
            }
        } else if let Some(rest) = line.strip_prefix("put ") {
            match rest.split_once(' ') {
                Some((key, value)) => Command::Put {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => Command::MissingValue,
            }
        } else if line.trim().is_empty() {
            Command::Empty
        } else {
            Command::Unknown(line.to_string())
        }
    }
}

/// Run commands from `input` until `exit` or end of input.
///
/// Storage errors are reported on `output` and the loop keeps going; only
/// failures to read input or write output end it early.
pub fn run<R: BufRead, W: Write>(db: &mut Database, input: R, mut output: W) -> Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;

        match Command::parse(&line) {
            Command::Exit => break,
            Command::Get { key } => match db.get(&key) {
                Ok(Some(value)) => writeln!(output, "{}", value)?,
                Ok(None) => writeln!(output, "Not found: {}", key)?,
                Err(e) => report(&mut output, &e)?,
            },
            Command::Put { key, value } => {
                if let Err(e) = db.put(&key, &value) {
                    report(&mut output, &e)?;
                }
            }
            Command::MissingValue => writeln!(output, "Usage: put <key> <value>")?,
            Command::Unknown(command) => writeln!(output, "Unknown command: {}", command)?,
            Command::Empty => {}
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    Ok(())
}

fn report<W: Write>(output: &mut W, e: &dyn std::error::Error) -> Result<()> {
    error!("{}", e);
    writeln!(output, "Error: {}", e)?;
    Ok(())
}
