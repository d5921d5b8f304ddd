use std::fs;

use qfile_record::{rec_type, RecordWriter};
use qfile_stream::QueueFile;
use tracing::debug;

use crate::cmd::{parse_type, PutArgs};
use crate::exit::{io_error, record_error, stream_error, CliError, CliResult, SUCCESS};
use crate::output::{print_written, OutputFormat};

enum Payload {
    Bytes(Vec<u8>),
    Padding(usize),
    Pointer(u64),
}

pub fn run(args: PutArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let rec_type = match (&payload, &args.rec_type) {
        (Payload::Pointer(_), _) => rec_type::PTR,
        (_, Some(input)) => parse_type(input)?,
        (_, None) => return Err(CliError::usage("--type is required")),
    };

    let file = QueueFile::open_append(&args.path).map_err(|err| stream_error("open failed", err))?;
    let mut writer = RecordWriter::new(file);
    let offset = writer
        .position()
        .map_err(|err| record_error("seek failed", err))?;

    let written = match payload {
        Payload::Bytes(bytes) => writer.write_record(rec_type, &bytes),
        Payload::Padding(min_size) => writer.write_padding(rec_type, min_size),
        Payload::Pointer(target) => writer.write_pointer(target),
    }
    .map_err(|err| record_error("write failed", err))?;
    writer
        .flush()
        .map_err(|err| record_error("flush failed", err))?;

    let end = writer
        .position()
        .map_err(|err| record_error("seek failed", err))?;
    let size = usize::try_from(end - offset).unwrap_or(usize::MAX);
    debug!(path = %args.path.display(), offset, rec_type = written, size, "appended record");
    print_written(offset, written, None, size, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &PutArgs) -> CliResult<Payload> {
    if let Some(target) = args.pointer {
        return Ok(Payload::Pointer(target));
    }
    if let Some(min_size) = args.pad {
        return Ok(Payload::Padding(min_size));
    }
    if let Some(data) = &args.data {
        return Ok(Payload::Bytes(data.as_bytes().to_vec()));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map(Payload::Bytes)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Payload::Bytes(Vec::new()))
}
