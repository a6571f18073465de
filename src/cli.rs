// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `procharness`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procharness",
    version,
    about = "Run a command with drained output, either passed through or captured.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `$PROCHARNESS_CONFIG`, else `Procharness.toml` in the current
    /// directory. A missing default file means built-in defaults.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCHARNESS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a command, forwarding its stdout/stderr to ours.
    Run {
        /// Program and arguments (use `--` before them).
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
    /// Run a command, capture its output, then print it.
    Capture {
        /// Program and arguments (use `--` before them).
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_takes_trailing_argv() {
        let args =
            CliArgs::try_parse_from(["procharness", "capture", "--", "ls", "-la", "/tmp"]).unwrap();
        match args.command {
            Command::Capture { argv } => assert_eq!(argv, ["ls", "-la", "/tmp"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn run_requires_a_program() {
        assert!(CliArgs::try_parse_from(["procharness", "run"]).is_err());
    }
}
