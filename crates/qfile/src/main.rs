mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "qfile", version, about = "Inspect and edit typed-record queue files")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_put_subcommand() {
        let cli = Cli::try_parse_from([
            "qfile",
            "put",
            "/tmp/queue",
            "--type",
            "RCPT",
            "--data",
            "rcpt@example.org",
        ])
        .expect("put args should parse");

        assert!(matches!(cli.command, Command::Put(_)));
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "qfile",
            "put",
            "/tmp/queue",
            "--type",
            "N",
            "--data",
            "hello",
            "--pad",
            "10",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn pointer_does_not_need_a_type() {
        let cli = Cli::try_parse_from(["qfile", "put", "/tmp/queue", "--pointer", "42"])
            .expect("pointer args should parse");
        match cli.command {
            Command::Put(args) => {
                assert_eq!(args.pointer, Some(42));
                assert!(args.rec_type.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn put_without_type_or_pointer_is_rejected() {
        let err = Cli::try_parse_from(["qfile", "put", "/tmp/queue", "--data", "x"])
            .expect_err("missing --type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_dump_with_global_format() {
        let cli = Cli::try_parse_from([
            "qfile",
            "dump",
            "/tmp/queue",
            "--raw",
            "--max-length",
            "4096",
            "--format",
            "json",
        ])
        .expect("dump args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Command::Dump(args) => {
                assert!(args.raw);
                assert_eq!(args.max_length, 4096);
                assert!(!args.resync);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
