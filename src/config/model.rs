// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::copier::DEFAULT_BUFFER_SIZE;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [exec]
/// buffer_size = 4096
/// announce = true
///
/// [temp]
/// root = "/var/tmp"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub exec: ExecConfig,

    #[serde(default)]
    pub temp: TempConfig,
}

/// `[exec]` section: process launching and output draining.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecConfig {
    /// Size of the copy buffer used by each drain task.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Log the pre-launch line at `info` (otherwise `debug`).
    #[serde(default = "default_announce")]
    pub announce: bool,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_announce() -> bool {
    true
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            announce: default_announce(),
        }
    }
}

/// `[temp]` section: where temp files and directories are created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TempConfig {
    /// Parent directory for new entries; the OS temp dir when unset.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// or [`ConfigFile::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub exec: ExecConfig,
    pub temp: TempConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(exec: ExecConfig, temp: TempConfig) -> Self {
        Self { exec, temp }
    }
}
