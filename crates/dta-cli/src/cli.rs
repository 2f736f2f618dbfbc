//! CLI argument definitions for the DTA writer.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use stata_dta::ByteOrder;

/// Accepted `--timestamp` layout.
pub const TIMESTAMP_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser)]
#[command(
    name = "dta-cli",
    version,
    about = "Write Stata .dta files from JSON dataset documents",
    long_about = "Write Stata .dta files from JSON dataset documents.\n\n\
                  Supports format versions 104 through 118, in either byte order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a JSON dataset document to a .dta file.
    Write(WriteArgs),

    /// List the supported format versions and their field widths.
    Versions,
}

#[derive(Parser)]
pub struct WriteArgs {
    /// Path to the JSON dataset document.
    #[arg(value_name = "DATASET_JSON")]
    pub input: PathBuf,

    /// Output .dta path (default: input path with a .dta extension).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Format version to write (104-118; 0 selects 111).
    #[arg(long = "format-version", value_name = "N", default_value_t = 0)]
    pub format_version: u16,

    /// Byte order of the output file.
    #[arg(long = "byte-order", value_enum, default_value = "native")]
    pub byte_order: ByteOrderArg,

    /// Header time stamp as "YYYY-MM-DD HH:MM" (default: now).
    #[arg(long = "timestamp", value_name = "TIME", value_parser = parse_timestamp)]
    pub timestamp: Option<NaiveDateTime>,
}

impl WriteArgs {
    /// Output path, derived from the input when `--output` is absent.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("dta"))
    }
}

/// CLI byte order choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ByteOrderArg {
    Native,
    Msf,
    Lsf,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(value: ByteOrderArg) -> Self {
        match value {
            ByteOrderArg::Native => ByteOrder::native(),
            ByteOrderArg::Msf => ByteOrder::Msf,
            ByteOrderArg::Lsf => ByteOrder::Lsf,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_INPUT_FORMAT)
        .map_err(|error| format!("expected \"YYYY-MM-DD HH:MM\": {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_args() {
        let cli = Cli::try_parse_from([
            "dta-cli",
            "write",
            "auto.json",
            "--format-version",
            "117",
            "--byte-order",
            "msf",
            "--timestamp",
            "2024-03-07 14:05",
        ])
        .unwrap();
        let Command::Write(args) = cli.command else {
            panic!("expected write command");
        };
        assert_eq!(args.format_version, 117);
        assert_eq!(ByteOrder::from(args.byte_order), ByteOrder::Msf);
        assert_eq!(
            args.timestamp.unwrap().format("%d %b %Y %H:%M").to_string(),
            "07 Mar 2024 14:05"
        );
        assert_eq!(args.output_path(), PathBuf::from("auto.dta"));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let result = Cli::try_parse_from(["dta-cli", "write", "a.json", "--timestamp", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dta-cli", "versions", "--log-format", "json"]).unwrap();
        assert!(matches!(cli.command, Command::Versions));
        assert!(matches!(cli.log_format, LogFormatArg::Json));
    }
}
