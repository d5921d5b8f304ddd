use std::path::PathBuf;

use qfile_record::rec_type::{DTXT, END, FROM, MESG, NORM, RCPT, SIZE, XTRA};
use qfile_record::{ReadFlags, Record, RecordError, RecordReader, RecordWriter};
use qfile_stream::{MemoryStream, QueueFile};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "qfile-record-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn logical(reader: &mut RecordReader<QueueFile>) -> Vec<(u8, String)> {
    reader
        .records(ReadFlags::DEFAULT)
        .map(|r| {
            let r = r.expect("record should decode");
            (r.rec_type, r.text().into_owned())
        })
        .collect()
}

#[test]
fn appended_recipient_is_spliced_in_through_pointers() {
    let dir = unique_temp_dir("splice");
    let path = dir.join("4F2A91C0");

    // Envelope with a reserved pointer slot after the first recipient.
    let mut writer = RecordWriter::new(QueueFile::create(&path).unwrap());
    writer.write_formatted(SIZE, format_args!("{:>15}", 0)).unwrap();
    writer.write_string(FROM, "sender@example.org").unwrap();
    writer.write_string(RCPT, "first@example.org").unwrap();
    let slot = writer.position().unwrap();
    writer.write_pointer(0).unwrap();
    let resume = writer.position().unwrap();
    writer.write_string(MESG, "").unwrap();
    writer.write_string(NORM, "Subject: hi").unwrap();
    writer.write_string(XTRA, "").unwrap();
    writer.write_string(END, "").unwrap();

    // Later: append a recipient plus a pointer back, then aim the slot at it.
    let appended = writer.seek_end().unwrap();
    writer.write_string(RCPT, "second@example.org").unwrap();
    writer.write_pointer(resume).unwrap();
    writer.rewrite_pointer_at(slot, appended).unwrap();
    writer.flush().unwrap();
    drop(writer);

    let mut reader = RecordReader::new(QueueFile::open(&path).unwrap());
    let records = logical(&mut reader);
    assert_eq!(
        records.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        vec![SIZE, FROM, RCPT, RCPT, MESG, NORM, XTRA, END]
    );
    assert_eq!(records[2].1, "first@example.org");
    assert_eq!(records[3].1, "second@example.org");
    assert_eq!(reader.guard().reverse_jumps(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn deleted_record_hidden_after_type_rewrite() {
    let dir = unique_temp_dir("retype");
    let path = dir.join("7B3C");

    let mut writer = RecordWriter::new(QueueFile::create(&path).unwrap());
    writer.write_string(RCPT, "keep@example.org").unwrap();
    let doomed = writer.position().unwrap();
    writer.write_string(RCPT, "drop@example.org").unwrap();
    writer.write_string(END, "").unwrap();
    writer.rewrite_type_at(DTXT, doomed).unwrap();
    drop(writer);

    let mut reader = RecordReader::new(QueueFile::open(&path).unwrap());
    assert_eq!(
        logical(&mut reader),
        vec![(RCPT, "keep@example.org".to_string()), (END, String::new())]
    );

    let mut raw = RecordReader::new(QueueFile::open(&path).unwrap());
    let types: Vec<u8> = raw
        .records(ReadFlags::NONE)
        .map(|r| r.unwrap().rec_type)
        .collect();
    assert_eq!(types, vec![RCPT, DTXT, END]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn padding_reserves_room_for_in_place_rewrite() {
    let mut writer = RecordWriter::new(MemoryStream::new("pad"));
    let start = writer.position().unwrap();
    writer.write_padding(DTXT, 50).unwrap();
    let end = writer.position().unwrap();
    assert!(end - start >= 50);

    let mut stream = writer.into_inner();
    stream.set_position(0);
    let mut reader = RecordReader::new(stream);
    let record = reader.read_record_raw(ReadFlags::NONE).unwrap().unwrap();
    assert!(record.wire_size() >= 50);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn readers_on_different_files_do_not_share_guard_state() {
    let mut first = RecordWriter::new(MemoryStream::new("first"));
    first.write_string(NORM, "x").unwrap();
    first.write_pointer(3).unwrap();
    let mut second = RecordWriter::new(MemoryStream::new("second"));
    second.write(&Record::new(NORM, "y")).unwrap();

    let mut a = first.into_inner();
    a.set_position(0);
    let mut b = second.into_inner();
    b.set_position(0);

    let mut looping = RecordReader::with_config(
        a,
        qfile_record::ReaderConfig {
            max_reverse_jumps: 2,
            ..Default::default()
        },
    );
    let mut healthy = RecordReader::new(b);

    looping.read_record().unwrap();
    assert!(matches!(
        looping.read_record(),
        Err(RecordError::TooManyReverseJumps { limit: 2 })
    ));
    assert_eq!(healthy.read_record().unwrap().unwrap().text(), "y");
    assert_eq!(healthy.guard().reverse_jumps(), 0);
}
