// In: src/main.rs

//! The casepipe command-line entry point.
//!
//! Everything here is glue: parse flags, assemble an immutable
//! `PipelineConfig`, hand it to `bridge::run_pipeline`, report the outcome.
//! Configuration errors print a one-line description followed by usage;
//! run failures print the error chain. No pipeline logic lives here.

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};

use casepipe::bridge;
use casepipe::config::{
    CompressionProfile, PipelineConfig, SinkSpec, SourceSpec, DEFAULT_OUTPUT_FILE,
};
use casepipe::CasepipeError;

fn build_cli() -> Command {
    Command::new("casepipe")
        .version(casepipe::VERSION)
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("FILENAME")
                .help("Process the file"),
        )
        .arg(
            Arg::new("stdin")
                .long("in")
                .action(ArgAction::SetTrue)
                .help("Process stdin"),
        )
        .arg(
            Arg::new("stdout")
                .long("out")
                .action(ArgAction::SetTrue)
                .help("Print to stdout instead of the default output file"),
        )
        .arg(
            Arg::new("compress")
                .long("compress")
                .action(ArgAction::SetTrue)
                .help("zstd-compress the output (appends .zst to a file sink)"),
        )
        .arg(
            Arg::new("uncompress")
                .long("uncompress")
                .action(ArgAction::SetTrue)
                .help("Un-zstd the input"),
        )
        .arg(
            Arg::new("fast")
                .long("fast")
                .action(ArgAction::SetTrue)
                .conflicts_with("best")
                .help("Favor speed over ratio when compressing"),
        )
        .arg(
            Arg::new("best")
                .long("best")
                .action(ArgAction::SetTrue)
                .help("Favor ratio over speed when compressing"),
        )
        .arg(
            Arg::new("operand")
                .value_name("-")
                .value_parser(["-"])
                .help("A bare '-' also selects stdin"),
        )
}

/// Turns parsed flags into an immutable configuration. All flag conflicts
/// and omissions are decided here, once; nothing downstream re-reads flags.
fn config_from_matches(matches: &ArgMatches) -> Result<PipelineConfig, CasepipeError> {
    let use_stdin =
        matches.get_flag("stdin") || matches.get_one::<String>("operand").is_some();

    let source = match (matches.get_one::<String>("file"), use_stdin) {
        (Some(_), true) => {
            return Err(CasepipeError::Config(
                "--file and --in are mutually exclusive".into(),
            ));
        }
        (Some(path), false) => SourceSpec::File(PathBuf::from(path)),
        (None, true) => SourceSpec::Stdin,
        (None, false) => {
            return Err(CasepipeError::Config(
                "no input source: pass --file {FILENAME}, --in, or -".into(),
            ));
        }
    };

    let sink = if matches.get_flag("stdout") {
        SinkSpec::Stdout
    } else {
        SinkSpec::File(PathBuf::from(DEFAULT_OUTPUT_FILE))
    };

    let profile = if matches.get_flag("fast") {
        CompressionProfile::Fast
    } else if matches.get_flag("best") {
        CompressionProfile::HighCompression
    } else {
        CompressionProfile::Balanced
    };

    let mut config = PipelineConfig::new(source, sink);
    config.decompress = matches.get_flag("uncompress");
    config.compress = matches.get_flag("compress");
    config.profile = profile;
    Ok(config)
}

fn main() {
    env_logger::init();

    let mut cmd = build_cli();
    let matches = cmd.clone().get_matches();

    let config = match config_from_matches(&matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!();
            let _ = cmd.print_help();
            process::exit(2);
        }
    };

    if let Err(err) = bridge::run_pipeline(&config) {
        eprintln!("casepipe: {}", err);
        if err.is_config() {
            eprintln!();
            let _ = cmd.print_help();
            process::exit(2);
        }
        process::exit(1);
    }
}
