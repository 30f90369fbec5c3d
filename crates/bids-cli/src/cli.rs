//! CLI argument definitions for the converter.

use std::path::PathBuf;

use bids_cli::pipeline::parse_participant_field;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "snirf2bids",
    version,
    about = "Convert SNIRF fNIRS acquisitions to BIDS metadata files",
    long_about = "Convert SNIRF fNIRS acquisitions to BIDS metadata files.\n\n\
                  Writes the coordsystem, optodes, channels, nirs and events files\n\
                  for each acquisition and updates participants.tsv and scans.tsv."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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
    /// Convert a SNIRF file, or every SNIRF file in a folder.
    Convert(ConvertArgs),

    /// List the BIDS fields of one file kind, or all file kinds.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// A `.snirf.json` file or a folder containing them.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (default: the input's folder).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Set a participants.tsv column, e.g. `--participant age=31`.
    #[arg(long = "participant", value_name = "KEY=VALUE", value_parser = parse_participant_field)]
    pub participant: Vec<(String, String)>,

    #[arg(long = "format", value_enum, default_value = "folder")]
    pub format: OutputFormatArg,

    /// Do not update participants.tsv and scans.tsv.
    #[arg(long = "no-dataset-tables")]
    pub no_dataset_tables: bool,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// File kind (`channels`, `_optodes.tsv`, `participants.tsv`, ...).
    #[arg(value_name = "FILE_KIND")]
    pub file_kind: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Folder,
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
