use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use qfile_record::{type_name, Record};
use serde::Serialize;

const PREVIEW_LIMIT: usize = 72;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    offset: u64,
    rec_type: u8,
    type_char: String,
    type_name: &'a str,
    length: usize,
    payload: String,
}

impl<'a> RecordOutput<'a> {
    fn from_record(record: &'a Record) -> Self {
        Self {
            offset: record.offset,
            rec_type: record.rec_type,
            type_char: type_char(record.rec_type),
            type_name: type_name(record.rec_type),
            length: record.len(),
            payload: payload_preview(record.payload.as_ref()),
        }
    }
}

pub fn print_records(records: &[Record], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for record in records {
                print_json(&RecordOutput::from_record(record));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "TYPE", "NAME", "LENGTH", "PAYLOAD"]);
            for record in records {
                let out = RecordOutput::from_record(record);
                table.add_row(vec![
                    out.offset.to_string(),
                    out.type_char,
                    out.type_name.to_string(),
                    out.length.to_string(),
                    out.payload,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for record in records {
                let out = RecordOutput::from_record(record);
                println!(
                    "offset={} type={} ({}) length={} payload={}",
                    out.offset, out.type_char, out.type_name, out.length, out.payload
                );
            }
        }
        OutputFormat::Raw => {
            let mut out = std::io::stdout().lock();
            for record in records {
                let _ = out.write_all(record.payload.as_ref());
                let _ = out.write_all(b"\n");
            }
            let _ = out.flush();
        }
    }
}

#[derive(Serialize)]
struct VerifyOutput<'a> {
    path: String,
    status: &'a str,
    records: usize,
    bytes: u64,
}

pub fn print_verify(path: &Path, records: usize, bytes: u64, format: OutputFormat) {
    let out = VerifyOutput {
        path: path.display().to_string(),
        status: "ok",
        records,
        bytes,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "STATUS", "RECORDS", "BYTES"])
                .add_row(vec![
                    out.path,
                    out.status.to_string(),
                    out.records.to_string(),
                    out.bytes.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "{}: {} ({} records, {} bytes)",
                out.path, out.status, out.records, out.bytes
            );
        }
    }
}

#[derive(Serialize)]
struct WriteOutput<'a> {
    offset: u64,
    rec_type: u8,
    type_char: String,
    type_name: &'a str,
    previous_type: Option<u8>,
    size: usize,
}

/// Report a record written by `put` or rewritten by `retype`.
pub fn print_written(
    offset: u64,
    rec_type: u8,
    previous_type: Option<u8>,
    size: usize,
    format: OutputFormat,
) {
    let out = WriteOutput {
        offset,
        rec_type,
        type_char: type_char(rec_type),
        type_name: type_name(rec_type),
        previous_type,
        size,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "TYPE", "NAME", "PREVIOUS", "SIZE"])
                .add_row(vec![
                    out.offset.to_string(),
                    out.type_char,
                    out.type_name.to_string(),
                    previous_type.map(type_char).unwrap_or_default(),
                    out.size.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => match previous_type {
            Some(previous) => println!(
                "offset={} type={} ({}) previous={} ({})",
                out.offset,
                out.type_char,
                out.type_name,
                type_char(previous),
                type_name(previous)
            ),
            None => println!(
                "offset={} type={} ({}) size={}",
                out.offset, out.type_char, out.type_name, out.size
            ),
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Printable form of a type byte: the character itself, or `\xNN`.
pub fn type_char(rec_type: u8) -> String {
    if rec_type.is_ascii_graphic() {
        char::from(rec_type).to_string()
    } else {
        format!("\\x{rec_type:02x}")
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().count() > PREVIEW_LIMIT => {
            let head: String = text.chars().take(PREVIEW_LIMIT).collect();
            format!("{head}...")
        }
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
