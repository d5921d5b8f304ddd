use qfile_record::{ReadFlags, RecordReader, RecordWriter};
use qfile_stream::QueueFile;
use tracing::info;

use crate::cmd::{parse_type, RetypeArgs};
use crate::exit::{record_error, stream_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_written, type_char, OutputFormat};

pub fn run(args: RetypeArgs, format: OutputFormat) -> CliResult<i32> {
    let new_type = parse_type(&args.rec_type)?;
    let file = QueueFile::open_rw(&args.path).map_err(|err| stream_error("open failed", err))?;

    // Decode the record first so a bad offset cannot corrupt the file.
    let mut reader = RecordReader::new(file);
    reader
        .seek_to(args.offset)
        .map_err(|err| record_error("seek failed", err))?;
    let record = reader
        .read_record_raw(ReadFlags::NONE)
        .map_err(|err| record_error(&format!("no valid record at offset {}", args.offset), err))?
        .ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("offset {} is at or past the end of the file", args.offset),
            )
        })?;

    let mut writer = RecordWriter::new(reader.into_inner());
    writer
        .rewrite_type_at(new_type, args.offset)
        .map_err(|err| record_error("rewrite failed", err))?;
    writer
        .flush()
        .map_err(|err| record_error("flush failed", err))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|err| stream_error("sync failed", err))?;

    info!(
        path = %args.path.display(),
        offset = args.offset,
        from = %type_char(record.rec_type),
        to = %type_char(new_type),
        "record retyped"
    );
    print_written(
        args.offset,
        new_type,
        Some(record.rec_type),
        record.wire_size(),
        format,
    );
    Ok(SUCCESS)
}
