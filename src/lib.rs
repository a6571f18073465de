// src/lib.rs

//! Test-support toolkit for running external processes.
//!
//! - [`exec`]: launch a child, drain stdout/stderr concurrently, wait for it
//!   either with caller-supplied sinks or with in-memory capture.
//! - [`temp`]: temp files/directories tracked by a registry and deleted by
//!   one cleanup pass.
//! - [`files`]: whole-file copy helpers and fixture lookup.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod files;
pub mod fs;
pub mod logging;
pub mod temp;

pub use errors::{HarnessError, Result};
pub use exec::{
    CapturedOutput, CapturingHandle, CommandSpec, Launcher, ProcessHandle, ProcessWait,
};
pub use temp::{ResourceRegistry, make_temp_dir, make_temp_file};

use std::io::Write;

use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, default_config_path, load_and_validate, load_or_default};

/// High-level entry point used by `main.rs`; returns the child's exit code.
///
/// This wires together:
/// - config loading
/// - the process-wide temp registry and its cleanup guard
/// - the launcher in inherited or capturing mode
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_config(&args)?;

    if !ResourceRegistry::init_global(&cfg.temp) {
        debug!("global temp registry was already initialised");
    }
    let _cleanup = temp::install_global_cleanup();

    let launcher = Launcher::from_config(&cfg.exec);

    match args.command {
        Command::Run { argv } => {
            let command = CommandSpec::from_argv(argv)?;
            let mut handle = launcher.launch_inherited(&command)?;
            handle.wait_for().await
        }
        Command::Capture { argv } => {
            let command = CommandSpec::from_argv(argv)?;
            let output = launcher.capture(&command).await?;
            print_captured(&output)?;
            Ok(output.exit_code)
        }
    }
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => load_and_validate(path),
        None => load_or_default(default_config_path()),
    }
}

fn print_captured(output: &CapturedOutput) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "--- stdout ({} bytes) ---", output.stdout.len())?;
    out.write_all(&output.stdout)?;
    if !output.stdout.ends_with(b"\n") && !output.stdout.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "--- stderr ({} bytes) ---", output.stderr.len())?;
    out.write_all(&output.stderr)?;
    if !output.stderr.ends_with(b"\n") && !output.stderr.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "--- exit code {} ---", output.exit_code)?;
    out.flush()?;
    Ok(())
}
