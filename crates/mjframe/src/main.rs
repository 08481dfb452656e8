mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mjframe", version, about = "MJPEG frame container tools")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
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
    fn parses_convert_subcommand() {
        let cli = Cli::try_parse_from(["mjframe", "convert", "movie.mjpeg", "movie.frames"])
            .expect("convert args should parse");

        assert!(matches!(cli.command, Command::Convert(_)));
    }

    #[test]
    fn rejects_convert_without_output() {
        let err = Cli::try_parse_from(["mjframe", "convert", "movie.mjpeg"])
            .expect_err("missing output should fail");

        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_frames_subcommand_with_limit() {
        let cli = Cli::try_parse_from(["mjframe", "frames", "movie.frames", "--limit", "3"])
            .expect("frames args should parse");

        let Command::Frames(args) = cli.command else {
            panic!("expected frames command");
        };
        assert_eq!(args.limit, Some(3));
    }

    #[test]
    fn parses_global_format_flag() {
        let cli = Cli::try_parse_from(["mjframe", "inspect", "movie.mjpeg", "--format", "json"])
            .expect("inspect args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
