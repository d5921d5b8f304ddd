//! Append a recipient to a finished queue file without rewriting it.
//!
//! The envelope reserves a pointer record after the recipient list. Adding a
//! recipient later means appending it plus a pointer back, then aiming the
//! reserved slot at the appended segment.
//!
//! Run with:
//!   cargo run --example splice-recipient
//!
//! Then inspect the result:
//!   cargo run -- dump <printed path> --raw

use std::fs;

use qfile::record::{rec_type, type_name, ReadFlags, RecordReader, RecordWriter};
use qfile::stream::QueueFile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join(format!("qfile-splice-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let path = dir.join("5D1E8A2F");
    let _ = fs::remove_file(&path);

    let mut writer = RecordWriter::new(QueueFile::create(&path)?);
    writer.write_string(rec_type::FROM, "sender@example.org")?;
    writer.write_string(rec_type::RCPT, "first@example.org")?;
    let slot = writer.position()?;
    writer.write_pointer(0)?;
    let resume = writer.position()?;
    writer.write_string(rec_type::MESG, "")?;
    writer.write_string(rec_type::NORM, "Subject: splice demo")?;
    writer.write_string(rec_type::XTRA, "")?;
    writer.write_string(rec_type::END, "")?;

    let appended = writer.seek_end()?;
    writer.write_string(rec_type::RCPT, "late@example.org")?;
    writer.write_pointer(resume)?;
    writer.rewrite_pointer_at(slot, appended)?;
    writer.flush()?;
    drop(writer);

    eprintln!("Wrote {}", path.display());

    let mut reader = RecordReader::new(QueueFile::open(&path)?);
    for record in reader.records(ReadFlags::DEFAULT) {
        let record = record?;
        println!(
            "{:>6}  {}  {:<16} {}",
            record.offset,
            char::from(record.rec_type),
            type_name(record.rec_type),
            record.text()
        );
    }

    Ok(())
}
