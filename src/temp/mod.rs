// src/temp/mod.rs

//! Ephemeral resource tracking.
//!
//! - [`naming`] normalises the prefix/suffix pair used for new entries.
//! - [`registry`] creates temp files/directories, remembers them in insertion
//!   order, and deletes them all when the host runs the cleanup pass.

pub mod naming;
pub mod registry;

pub use registry::{
    CleanupGuard, CleanupReport, DeletionFailure, ResourceKind, ResourceRegistry, TempResource,
};

use std::path::PathBuf;

use crate::errors::Result;

/// Create a registered temp file in the process-wide registry.
pub fn make_temp_file(prefix: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
    ResourceRegistry::global().make_temp_file(prefix, suffix)
}

/// Create a registered temp directory in the process-wide registry.
pub fn make_temp_dir(prefix: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
    ResourceRegistry::global().make_temp_dir(prefix, suffix)
}

/// Install the cleanup hook of the process-wide registry.
///
/// Returns `None` if it was already installed. Keep the guard alive for as
/// long as temp resources are in use (typically the whole of `main`).
pub fn install_global_cleanup() -> Option<CleanupGuard<'static>> {
    ResourceRegistry::global().install_cleanup()
}
