//! `ccjson` command-line entry point.
//!
//! Reads one file, runs it through the lexer and parser, and reports the
//! outcome. Exit code 0 means the file holds exactly one valid JSON value;
//! 1 means it could not be read or is not valid; 2 is a usage error.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use ccjson::{ParserOptions, Value};
use clap::{ArgAction, Parser, ValueHint};
use thiserror::Error;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "ccjson",
    version,
    about = "Check that a file contains exactly one valid JSON value",
    long_about = None,
    after_help = r#"EXAMPLES
  $ ccjson config.json
  $ ccjson --compact data.json
  $ ccjson --quiet --max-depth 16 untrusted.json"#
)]
struct Cli {
    #[arg(help = "File to validate", value_hint = ValueHint::FilePath)]
    path: PathBuf,

    #[arg(long, help = "Print the parsed value on a single line")]
    compact: bool,

    #[arg(short, long, conflicts_with = "compact", help = "Only print the verdict")]
    quiet: bool,

    #[arg(
        long,
        value_name = "N",
        conflicts_with = "no_depth_limit",
        help = "Reject arrays and objects nested deeper than N levels (default: 128)"
    )]
    max_depth: Option<usize>,

    #[arg(long, help = "Accept any nesting depth")]
    no_depth_limit: bool,

    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Log progress to stderr; repeat for more detail"
    )]
    verbose: u8,
}

impl Cli {
    fn parser_options(&self) -> ParserOptions {
        if self.no_depth_limit {
            ParserOptions::unbounded()
        } else if let Some(max_depth) = self.max_depth {
            ParserOptions {
                max_depth: Some(max_depth),
            }
        } else {
            ParserOptions::default()
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read file \"{path}\": {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: ccjson::Error,
    },
    #[error("could not write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Read { .. } | CliError::Invalid { .. } | CliError::Output(_) => 1,
        }
    }

    fn emit(&self) {
        match self {
            CliError::Invalid { .. } => eprintln!("{self}"),
            CliError::Read { .. } | CliError::Output(_) => eprintln!("Error: {self}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "check failed");
            err.emit();
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let display = cli.path.display().to_string();
    let options = cli.parser_options();
    tracing::info!(path = %cli.path.display(), max_depth = ?options.max_depth, "checking file");

    let text = read_input(&cli.path, &display)?;
    let value = ccjson::from_str_with_options(&text, options).map_err(|source| {
        CliError::Invalid {
            path: display.clone(),
            source,
        }
    })?;
    tracing::info!(root = value.type_name(), "file is valid");

    match report(&display, &value, cli) {
        // A closed stdout (e.g. `ccjson big.json | head`) is not a failure.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.map_err(CliError::Output),
    }
}

fn read_input(path: &Path, display: &str) -> Result<String, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: display.to_string(),
        source,
    })?;
    tracing::debug!(bytes = text.len(), "read input");
    Ok(text)
}

fn report(display: &str, value: &Value, cli: &Cli) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Valid JSON in {display}:")?;
    if cli.quiet {
        return Ok(());
    }
    if cli.compact {
        writeln!(out, "{value}")
    } else {
        writeln!(out, "{}", value.to_pretty_string())
    }
}
