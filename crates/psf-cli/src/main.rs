//! Parameter-set file CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use psf_cli::commands::{run_copy, run_show, run_update_checksum, run_verify};
use psf_cli::logging::{LogConfig, LogFormat, init_logging};
use psf_filer::ReadOptions;
use psf_xml::checksum::format_checksum;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_copy, print_show, print_verify};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Verify(args) => match run_verify(&args.file) {
            Ok(report) => {
                print_verify(&report);
                if report.is_valid() { 0 } else { 1 }
            }
            Err(error) => report_error(&error),
        },
        Command::UpdateChecksum(args) => match run_update_checksum(&args.file) {
            Ok(checksum) => {
                println!("{}: checksum {}", args.file.display(), format_checksum(checksum));
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Show(args) => {
            let options = ReadOptions::default()
                .with_ignore_checksum(args.ignore_checksum)
                .with_interpreted_only(args.interpreted_only);
            match run_show(&args.file, options) {
                Ok(result) if args.json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => {
                        println!("{json}");
                        0
                    }
                    Err(error) => report_error(&error.into()),
                },
                Ok(result) => {
                    print_show(&result);
                    0
                }
                Err(error) => report_error(&error),
            }
        }
        Command::Copy(args) => match run_copy(
            &args.input,
            &args.output,
            args.interpreted_only,
            args.comment.as_deref(),
        ) {
            Ok(result) => {
                print_copy(&result);
                0
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
