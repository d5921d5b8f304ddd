use qfile_record::{ReadFlags, ReaderConfig, RecordReader};
use qfile_stream::QueueFile;
use tracing::info;

use crate::cmd::VerifyArgs;
use crate::exit::{record_error, stream_error, CliResult, SUCCESS};
use crate::output::{print_verify, OutputFormat};

pub fn run(args: VerifyArgs, format: OutputFormat) -> CliResult<i32> {
    let file = QueueFile::open(&args.path).map_err(|err| stream_error("open failed", err))?;
    let bytes = file.len().map_err(|err| stream_error("stat failed", err))?;
    let config = ReaderConfig {
        max_length: args.max_length,
        ..ReaderConfig::default()
    };

    let mut reader = RecordReader::with_config(file, config);
    let mut count = 0usize;
    for record in reader.records(ReadFlags::DEFAULT) {
        if let Err(err) = record {
            let context = format!("{}: record {} is invalid", args.path.display(), count + 1);
            return Err(record_error(&context, err));
        }
        count += 1;
    }

    info!(path = %args.path.display(), records = count, "queue file verified");
    print_verify(&args.path, count, bytes, format);
    Ok(SUCCESS)
}
