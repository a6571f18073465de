// src/logging.rs

//! Process-wide `tracing` subscriber for the `procharness` binary.
//!
//! The level comes from `--log-level` when given, otherwise from
//! `PROCHARNESS_LOG`, otherwise `info`. Output goes to stderr: a child run
//! in inherited mode owns stdout.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "PROCHARNESS_LOG";

/// Install the subscriber. Errors if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let from_env = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, from_env.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("cannot install logging subscriber: {e}"))
}

/// Unparseable env values fall through to the default.
fn resolve_level(cli_level: Option<LogLevel>, from_env: Option<&str>) -> Level {
    if let Some(level) = cli_level {
        return match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }

    match from_env.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => Level::ERROR,
        Some("warn" | "warning") => Level::WARN,
        Some("debug") => Level::DEBUG,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    }
}
