//! CLI argument definitions for the parameter-set tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "psf",
    version,
    about = "Inspect, verify and rewrite parameter-set files",
    long_about = "Inspect, verify and rewrite checksum-protected parameter-set files.\n\n\
                  A parameter-set file holds NVM snapshots of one or more nodes, both as\n\
                  raw memory entries and as interpreted data pools."
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
    /// Compare the stored checksum with the file content.
    Verify(FileArgs),

    /// Recompute and store the checksum of a file.
    UpdateChecksum(FileArgs),

    /// Print file info and a per-node overview.
    Show(ShowArgs),

    /// Read a file and write it again as a clean, checksummed copy.
    Copy(CopyArgs),
}

#[derive(Parser)]
pub struct FileArgs {
    /// Parameter-set file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Parameter-set file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Load the file even if its checksum is missing or wrong.
    #[arg(long = "ignore-checksum")]
    pub ignore_checksum: bool,

    /// Skip the raw memory records.
    #[arg(long = "interpreted-only")]
    pub interpreted_only: bool,

    /// Print the loaded registry as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct CopyArgs {
    /// Source parameter-set file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination; must not exist yet.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Copy only the interpreted records.
    #[arg(long = "interpreted-only")]
    pub interpreted_only: bool,

    /// Replace the user comment of the copy.
    #[arg(long = "comment", value_name = "TEXT")]
    pub comment: Option<String>,
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
