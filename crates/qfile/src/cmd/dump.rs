use qfile_record::{ReadFlags, ReaderConfig, Record, RecordError, RecordReader};
use qfile_stream::QueueFile;
use tracing::{debug, warn};

use crate::cmd::DumpArgs;
use crate::exit::{record_error, stream_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_records, OutputFormat};

#[derive(Debug, Default)]
struct Walk {
    records: Vec<Record>,
    skipped: usize,
    error: Option<RecordError>,
}

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let file = QueueFile::open(&args.path).map_err(|err| stream_error("open failed", err))?;
    let config = ReaderConfig {
        max_length: args.max_length,
        resync_on_oversize: args.resync,
        ..ReaderConfig::default()
    };
    let flags = if args.raw {
        ReadFlags::NONE
    } else {
        ReadFlags::DEFAULT
    };

    let mut reader = RecordReader::with_config(file, config);
    let walk = walk(&mut reader, flags, args.resync);
    debug!(count = walk.records.len(), skipped = walk.skipped, "dump finished");

    // Whatever decoded before a failure is still worth showing.
    print_records(&walk.records, format);

    if let Some(err) = walk.error {
        let context = format!("read failed after {} records", walk.records.len());
        return Err(record_error(&context, err));
    }
    if walk.skipped > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

/// Read records until end of stream or the first error. With `resync`,
/// oversized records are counted and stepped over instead.
fn walk(reader: &mut RecordReader<QueueFile>, flags: ReadFlags, resync: bool) -> Walk {
    let mut walk = Walk::default();
    loop {
        match reader.read_record_raw(flags) {
            Ok(Some(record)) => walk.records.push(record),
            Ok(None) => return walk,
            Err(RecordError::LengthOutOfRange { length, max }) if resync => {
                warn!(length, max, "skipped oversized record");
                walk.skipped += 1;
            }
            Err(err) => {
                walk.error = Some(err);
                return walk;
            }
        }
    }
}
