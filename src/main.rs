// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::tty::IsTty;
use tracing::debug;

mod config;
mod error;
mod filter;
mod render;
mod slurm;

use config::{ColorMode, Config};
use error::{GresError, Result};
use filter::FilterSpec;
use render::{Renderer, StyleSpec, DEFAULT_STYLE};
use slurm::{FileInput, FileSource, ResourceSource, ScontrolSource};

const EXIT_CODES: &str = "\
Exit codes:
  0  success (including no matching resources)
  1  usage or configuration error
  2  resource manager unavailable (scontrol failed or timed out)
  3  resource manager output could not be parsed
  4  unknown style";

#[derive(Parser, Debug)]
#[command(name = "gresinfo")]
#[command(about = "List Slurm generic resource (GRES) allocations per node")]
#[command(version, after_help = EXIT_CODES)]
struct Args {
    /// Substring of the GRES name to show, e.g. "gpu" or "a100" (case-insensitive)
    #[arg(value_name = "GRES")]
    gres: String,

    /// Only show nodes in a partition whose name contains this
    #[arg(short, long)]
    partition: Option<String>,

    /// Output style: default, modern, compact, json, or one defined in the config file
    #[arg(short, long)]
    style: Option<String>,

    /// When to use colours
    #[arg(long, value_enum, env = "GRESINFO_COLOR")]
    color: Option<ColorMode>,

    /// Omit the table header
    #[arg(long)]
    no_header: bool,

    /// Read a saved `scontrol show nodes --json` document instead of querying Slurm ("-" for stdin)
    #[arg(short, long, value_name = "PATH")]
    input: Option<String>,

    /// scontrol executable to run
    #[arg(long, value_name = "CMD", env = "GRESINFO_SCONTROL")]
    scontrol: Option<String>,

    /// Give up on scontrol after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Config file (default: $XDG_CONFIG_HOME/gresinfo/config.json)
    #[arg(short, long, value_name = "PATH", env = "GRESINFO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging to stderr; stdout is reserved for the rendered result
fn init_logging(verbose: bool) {
    let filter = if verbose { "gresinfo=debug" } else { "gresinfo=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_env("GRESINFO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_tty())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version are reported as "errors" that go to stdout
            if !err.use_stderr() {
                return ExitCode::SUCCESS;
            }
            return ExitCode::from(&GresError::Usage(err.to_string()));
        }
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(&err)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    // Resolve everything that can fail on user input before touching Slurm
    let style_name = args
        .style
        .clone()
        .or_else(|| config.style.clone())
        .unwrap_or_else(|| DEFAULT_STYLE.to_string());
    let style = StyleSpec::resolve(&style_name, &config.styles)?;
    let color = args.color.or(config.color).unwrap_or_default().resolve();
    let spec = FilterSpec::new(args.gres.clone(), args.partition.clone());
    debug!(style = %style.name, color, ?spec, "resolved invocation");

    let source = build_source(args, &config);
    let entries = source.fetch()?;
    let total = entries.len();

    let matched = filter::apply(entries, &spec);
    debug!(total, matched = matched.len(), "filtered entries");

    let output = Renderer::new(color)
        .with_header(!args.no_header)
        .render(&matched, &style);
    write_stdout(&output)
}

fn build_source(args: &Args, config: &Config) -> Box<dyn ResourceSource> {
    if let Some(input) = &args.input {
        return Box::new(FileSource::new(FileInput::from(input.as_str())));
    }

    let command = args.scontrol.clone().unwrap_or_else(|| config.source.command.clone());
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.source.timeout());
    Box::new(ScontrolSource::new(command, config.source.args.clone(), timeout))
}

/// Write the complete output in one go. A closed pipe (`| head`) is not an error.
fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let written = writeln!(stdout, "{}", output).and_then(|_| stdout.flush());
    match written {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}
