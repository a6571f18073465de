// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only failures that happen on the caller's thread become values of
//! [`HarnessError`]. Failures inside background drain tasks and during the
//! temp cleanup pass are reported through `tracing` instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::temp::ResourceKind;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("command line must contain at least a program name")]
    EmptyCommand,

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{stream} drain for `{command}` did not complete: {message}")]
    DrainJoin {
        command: String,
        stream: &'static str,
        message: String,
    },

    #[error("process `{0}` has not been waited for yet")]
    NotFinished(String),

    #[error("copy failed: {0}")]
    Copy(#[source] io::Error),

    #[error("unable to create temporary {kind} in {dir:?}: {source}")]
    ResourceCreation {
        kind: ResourceKind,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to find resource \"{name}\" under {root:?}")]
    ResourceNotFound { name: String, root: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
