//! netfir CLI: lowers a JSON netlist to FIRRTL.
//!
//! `netfir design.json out.fir` reads the design, applies `netfir.toml` and
//! command-line settings, lowers every module and writes the circuit.
//! Diagnostics go to stderr; the FIRRTL text goes to the output file or
//! stdout.

#![warn(missing_docs)]

mod convert;
mod report;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::convert::UsageError;

/// netfir: gate-level netlist to FIRRTL converter.
#[derive(Parser, Debug)]
#[command(name = "netfir", version, about = "Lower a JSON netlist to FIRRTL")]
pub struct Cli {
    /// Path to a custom `netfir.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Module to use as the circuit top.
    #[arg(long)]
    pub top: Option<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Fail when any warning is reported.
    #[arg(long)]
    pub deny_warnings: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Also print per-module summaries.
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The netlist to lower, as JSON.
    pub design: PathBuf,

    /// Output file. Defaults to `output.path` from the config, else stdout.
    pub output: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per diagnostic.
    Json,
}

impl From<ReportFormat> for netfir_config::ReportFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Text => netfir_config::ReportFormat::Text,
            ReportFormat::Json => netfir_config::ReportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match convert::run(&cli, color) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            let code = if e.downcast_ref::<UsageError>().is_some() { 2 } else { 1 };
            process::exit(code);
        }
    }
}

/// Best-effort terminal detection from the environment.
fn atty_is_terminal() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && std::env::var("TERM").is_ok_and(|term| term != "dumb")
}
