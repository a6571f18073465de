// src/fs/mod.rs

//! Filesystem seam used by the temp resource registry.
//!
//! The registry never touches `std::fs` directly, so tests can swap in
//! [`mock::MockFileSystem`] and inject deletion failures that are hard to
//! provoke on a real disk (e.g. when tests run as root).

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;

/// What a path currently points at, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Kind of the entry at `path`, or `None` if nothing is there.
    ///
    /// Symlinks are reported as `File` so that deletion removes the link
    /// instead of descending into its target.
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Return the entries of a directory as full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Atomically create a new, empty file named `<prefix><random><suffix>`
    /// inside `dir` and return its path.
    fn create_temp_file(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf>;

    /// Same as [`FileSystem::create_temp_file`], for a directory.
    fn create_temp_dir(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf>;
}

/// Implementation that uses `std::fs` and `tempfile`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = fs::symlink_metadata(path).ok()?;
        if meta.is_dir() {
            Some(EntryKind::Dir)
        } else {
            Some(EntryKind::File)
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn create_temp_file(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)?;
        let (_file, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }

    fn create_temp_dir(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempdir_in(dir)?;
        // The registry owns deletion from here on.
        Ok(dir.keep())
    }
}
