use clap::{Args, Subcommand};
use std::path::PathBuf;

use qfile_record::rec_type;

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod dump;
pub mod put;
pub mod retype;
pub mod verify;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the records of a queue file.
    Dump(DumpArgs),
    /// Walk a queue file and report the first malformed record.
    Verify(VerifyArgs),
    /// Append one record to a queue file.
    Put(PutArgs),
    /// Rewrite the type byte of one record in place.
    Retype(RetypeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format),
        Command::Verify(args) => verify::run(args, format),
        Command::Put(args) => put::run(args, format),
        Command::Retype(args) => retype::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Queue file to read.
    pub path: PathBuf,
    /// Show every physical record: pointers, padding and anything past END.
    #[arg(long)]
    pub raw: bool,
    /// Largest accepted payload length (0 = unbounded).
    #[arg(long, env = "QFILE_MAX_LENGTH", default_value_t = 0)]
    pub max_length: usize,
    /// Skip over oversized records instead of stopping at the first one.
    #[arg(long)]
    pub resync: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Queue file to check.
    pub path: PathBuf,
    /// Largest accepted payload length (0 = unbounded).
    #[arg(long, env = "QFILE_MAX_LENGTH", default_value_t = 0)]
    pub max_length: usize,
}

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Queue file to append to. Created if missing.
    pub path: PathBuf,
    /// Record type: a character, a decimal byte value, or a name such as RCPT.
    #[arg(
        long = "type",
        value_name = "TYPE",
        required_unless_present = "pointer",
        conflicts_with = "pointer"
    )]
    pub rec_type: Option<String>,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["file", "pad", "pointer"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "pad", "pointer"])]
    pub file: Option<PathBuf>,
    /// Write a padding record of at least this many bytes.
    #[arg(long, value_name = "BYTES", conflicts_with_all = ["data", "file", "pointer"])]
    pub pad: Option<usize>,
    /// Write a fixed-width pointer record to this offset.
    #[arg(long, value_name = "OFFSET", conflicts_with_all = ["data", "file", "pad"])]
    pub pointer: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RetypeArgs {
    /// Queue file to modify.
    pub path: PathBuf,
    /// Offset of the record's type byte.
    #[arg(long)]
    pub offset: u64,
    /// New record type: a character, a decimal byte value, or a name.
    #[arg(long = "type", value_name = "TYPE")]
    pub rec_type: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Resolve a `--type` argument. Names win over digits, and digits over a
/// literal character, so `5` is the byte 5 rather than `'5'`.
pub fn parse_type(input: &str) -> CliResult<u8> {
    if let Some(value) = rec_type::from_name(input) {
        return Ok(value);
    }
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse::<u8>().map_err(|_| {
            CliError::usage(format!("record type {input} is outside the range 0-255"))
        });
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(CliError::usage(format!(
            "unknown record type {input:?}: expected a name, a number 0-255 or one ASCII character"
        ))),
    }
}
