// src/config/mod.rs

//! Configuration loading.
//!
//! - [`model`] holds the serde types for `Procharness.toml`.
//! - [`validate`] turns a [`RawConfigFile`] into a checked [`ConfigFile`].
//! - [`loader`] reads the file from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, ExecConfig, RawConfigFile, TempConfig};
