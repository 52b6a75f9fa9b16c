//! The conversion command: load, lower, report, write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use netfir_config::{find_config, load_config, resolve_settings, NetfirConfig, Overrides};
use netfir_diagnostics::DiagnosticSink;
use netfir_firrtl::{lower_design_with, LowerOptions};
use netfir_netlist::{Design, NetlistError, Selection};
use thiserror::Error;

use crate::report::{count, render_all, DiagnosticPolicy};
use crate::Cli;

/// Invocations that are rejected before any lowering happens.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Only whole designs can be lowered.
    #[error("design has a partial selection ({0}); select the whole design first")]
    PartialSelection(String),
}

/// Failures reading the netlist or writing the circuit.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The netlist file could not be read.
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The netlist file is not a valid JSON design.
    #[error("failed to parse `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The netlist parsed but is internally inconsistent.
    #[error("invalid netlist: {0}")]
    Invalid(#[from] NetlistError),
    /// The output could not be written.
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and validates a JSON netlist.
pub fn load_design(path: &Path) -> Result<Design, ConvertError> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let design: Design = serde_json::from_str(&content).map_err(|source| ConvertError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    design.validate()?;
    Ok(design)
}

/// Loads `--config`, else `netfir.toml` in the working directory, else defaults.
fn load_project_config(cli: &Cli) -> Result<NetfirConfig, Box<dyn std::error::Error>> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => std::env::current_dir().ok().and_then(|dir| find_config(&dir)),
    };
    match path {
        Some(path) => Ok(load_config(&path)?),
        None => Ok(NetfirConfig::default()),
    }
}

/// Runs one conversion and returns the process exit code.
///
/// Exit code 0 means the circuit was written. Exit code 1 means errors were
/// reported (including warnings promoted by the diagnostic policy) and
/// nothing was written.
pub fn run(cli: &Cli, color: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_project_config(cli)?;
    let overrides = Overrides {
        top: cli.top.clone(),
        output: cli.output.clone(),
        format: cli.format.map(Into::into),
        deny_warnings: cli.deny_warnings,
    };
    let settings = resolve_settings(&config, &overrides);

    if !cli.quiet {
        eprintln!("   Lowering {}", cli.design.display());
    }
    let design = load_design(&cli.design)?;
    if let Selection::Partial(names) = &design.selection {
        return Err(UsageError::PartialSelection(names.join(", ")).into());
    }

    let sink = DiagnosticSink::new();
    let options = LowerOptions {
        top: settings.top.clone(),
    };
    let lowered = lower_design_with(&design, &options, &sink);
    let mut diagnostics = sink.take_all();
    let text = match lowered {
        Ok(text) => Some(text),
        Err(e) => {
            diagnostics.push(e.to_diagnostic());
            None
        }
    };

    let shown = DiagnosticPolicy::new(&settings, cli.verbose, cli.quiet).apply(diagnostics);
    eprint!("{}", render_all(&shown, settings.format, color));
    let (errors, warnings) = count(&shown);

    let text = match text {
        Some(text) if errors == 0 => text,
        _ => {
            if !cli.quiet {
                eprintln!("   Result: {errors} error(s), {warnings} warning(s); no output written");
            }
            return Ok(1);
        }
    };

    match &settings.output {
        Some(path) => fs::write(path, &text).map_err(|source| ConvertError::Write {
            path: path.clone(),
            source,
        })?,
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }

    if !cli.quiet {
        eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
        if let Some(path) = &settings.output {
            eprintln!("   Wrote {}", path.display());
        }
    }
    Ok(0)
}
