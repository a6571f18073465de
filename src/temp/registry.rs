// src/temp/registry.rs

//! Registry of temp files/directories created during the process lifetime.
//!
//! Every entry is appended on creation and deleted, in insertion order, by a
//! single cleanup pass. The pass is triggered explicitly by the host: either
//! by calling [`ResourceRegistry::run_cleanup`] or by dropping the guard
//! returned from [`ResourceRegistry::install_cleanup`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::{debug, warn};

use crate::config::TempConfig;
use crate::errors::{HarnessError, Result};
use crate::fs::{EntryKind, FileSystem, RealFileSystem};
use crate::temp::naming::{normalize_prefix, normalize_suffix};

static GLOBAL: OnceLock<ResourceRegistry> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Dir,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::File => f.write_str("file"),
            ResourceKind::Dir => f.write_str("directory"),
        }
    }
}

/// One registered temp file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempResource {
    pub path: PathBuf,
    pub kind: ResourceKind,
    /// The registry owns this entry and will delete it during cleanup.
    pub registered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a cleanup pass (or of deleting a single entry).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Number of filesystem entries (files and directories) removed.
    pub removed: usize,
    pub failures: Vec<DeletionFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: CleanupReport) {
        self.removed += other.removed;
        self.failures.extend(other.failures);
    }
}

#[derive(Debug)]
pub struct ResourceRegistry {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    entries: Mutex<Vec<TempResource>>,
    cleanup_installed: AtomicBool,
}

impl ResourceRegistry {
    /// Create a registry that allocates entries under `root`.
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            entries: Mutex::new(Vec::new()),
            cleanup_installed: AtomicBool::new(false),
        }
    }

    /// Registry on the real filesystem, rooted at `[temp].root` or the OS temp
    /// directory.
    pub fn from_config(cfg: &TempConfig) -> Self {
        let root = cfg.root.clone().unwrap_or_else(std::env::temp_dir);
        Self::new(Arc::new(RealFileSystem), root)
    }

    /// The process-wide registry.
    ///
    /// Initialised on first use with the OS temp directory unless
    /// [`ResourceRegistry::init_global`] ran before.
    pub fn global() -> &'static ResourceRegistry {
        GLOBAL.get_or_init(|| Self::from_config(&TempConfig::default()))
    }

    /// Configure the process-wide registry. Returns `false` if it was
    /// already initialised (the existing one is kept).
    pub fn init_global(cfg: &TempConfig) -> bool {
        GLOBAL.set(Self::from_config(cfg)).is_ok()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn make_temp_file(&self, prefix: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
        self.make(ResourceKind::File, prefix, suffix)
    }

    pub fn make_temp_dir(&self, prefix: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
        self.make(ResourceKind::Dir, prefix, suffix)
    }

    fn make(&self, kind: ResourceKind, prefix: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
        let prefix = normalize_prefix(prefix);
        let suffix = normalize_suffix(suffix);
        let creation_error = |source: std::io::Error| HarnessError::ResourceCreation {
            kind,
            dir: self.root.clone(),
            source,
        };

        let created = match kind {
            ResourceKind::File => self.fs.create_temp_file(&self.root, &prefix, &suffix),
            ResourceKind::Dir => self.fs.create_temp_dir(&self.root, &prefix, &suffix),
        }
        .map_err(creation_error)?;

        // Register before canonicalising so a failure below cannot leak it.
        self.lock().push(TempResource {
            path: created.clone(),
            kind,
            registered: true,
        });

        let path = self.fs.canonicalize(&created).map_err(creation_error)?;
        if path != created {
            let mut entries = self.lock();
            if let Some(entry) = entries.iter_mut().rev().find(|e| e.path == created) {
                entry.path = path.clone();
            }
        }

        debug!(path = ?path, %kind, "registered temp resource");
        Ok(path)
    }

    /// Snapshot of the currently registered entries, in insertion order.
    pub fn resources(&self) -> Vec<TempResource> {
        self.lock().clone()
    }

    /// Delete one entry now and drop it from the registry.
    ///
    /// Returns `false` (and touches nothing) when `path` is not registered.
    /// If deletion fails the entry stays registered, so the cleanup pass
    /// retries it.
    pub fn delete(&self, path: &Path) -> Result<bool> {
        if !self.lock().iter().any(|e| e.path == path) {
            return Ok(false);
        }

        let report = self.delete_entry(path);
        if let Some(failure) = report.failures.into_iter().next() {
            return Err(HarnessError::Io(std::io::Error::other(format!(
                "unable to delete {:?}: {}",
                failure.path, failure.error
            ))));
        }

        self.lock().retain(|e| e.path != path);
        Ok(true)
    }

    /// Mark the cleanup hook as installed and return the guard that runs it.
    ///
    /// Only the first call returns a guard; the pass runs when it is dropped.
    pub fn install_cleanup(&self) -> Option<CleanupGuard<'_>> {
        if self.cleanup_installed.swap(true, Ordering::SeqCst) {
            return None;
        }
        debug!(root = ?self.root, "temp cleanup hook installed");
        Some(CleanupGuard { registry: self })
    }

    /// Delete every registered entry in insertion order.
    ///
    /// The list is drained under the lock, so a second pass only sees entries
    /// registered after the first one. Failures never stop the pass.
    pub fn run_cleanup(&self) -> CleanupReport {
        let entries = std::mem::take(&mut *self.lock());
        let mut report = CleanupReport::default();
        for entry in &entries {
            report.merge(self.delete_entry(&entry.path));
        }
        debug!(
            entries = entries.len(),
            removed = report.removed,
            failures = report.failures.len(),
            "temp cleanup pass finished"
        );
        report
    }

    fn delete_entry(&self, path: &Path) -> CleanupReport {
        let mut report = CleanupReport::default();
        delete_recursive(self.fs.as_ref(), path, &mut report);
        report
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TempResource>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn delete_recursive(fs: &dyn FileSystem, path: &Path, report: &mut CleanupReport) {
    let result = match fs.entry_kind(path) {
        None => return,
        Some(EntryKind::File) => fs.remove_file(path),
        Some(EntryKind::Dir) => {
            match fs.read_dir(path) {
                Ok(children) => {
                    for child in children {
                        delete_recursive(fs, &child, report);
                    }
                }
                Err(e) => record_failure(report, path, &e),
            }
            fs.remove_dir(path)
        }
    };

    match result {
        Ok(()) => report.removed += 1,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => record_failure(report, path, &e),
    }
}

fn record_failure(report: &mut CleanupReport, path: &Path, error: &std::io::Error) {
    warn!(path = ?path, error = %error, "unable to delete temp resource");
    report.failures.push(DeletionFailure {
        path: path.to_path_buf(),
        error: error.to_string(),
    });
}

/// Runs the registry's cleanup pass when dropped.
#[must_use = "dropping the guard runs the cleanup pass immediately"]
pub struct CleanupGuard<'a> {
    registry: &'a ResourceRegistry,
}

impl CleanupGuard<'_> {
    /// Run the cleanup pass now and report on it.
    pub fn finish(self) -> CleanupReport {
        let report = self.registry.run_cleanup();
        std::mem::forget(self);
        report
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        self.registry.run_cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn mock_registry() -> (MockFileSystem, ResourceRegistry) {
        let fs = MockFileSystem::new();
        fs.add_dir("/tmp");
        let registry = ResourceRegistry::new(Arc::new(fs.clone()), "/tmp");
        (fs, registry)
    }

    #[test]
    fn entries_are_kept_in_insertion_order() {
        let (_fs, registry) = mock_registry();
        let a = registry.make_temp_file(None, None).unwrap();
        let b = registry.make_temp_dir(Some("work"), None).unwrap();
        let c = registry.make_temp_file(Some("build"), Some("log")).unwrap();

        let paths: Vec<_> = registry.resources().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec![a, b, c]);
        assert!(registry.resources().iter().all(|r| r.registered));
    }

    #[test]
    fn cleanup_continues_past_undeletable_entries() {
        let (fs, registry) = mock_registry();
        let dir = registry.make_temp_dir(None, None).unwrap();
        for i in 0..5 {
            fs.add_file(dir.join(format!("f{i}")), b"data".to_vec());
        }
        fs.add_file(dir.join("nested/deep/g"), b"data".to_vec());
        fs.deny_removal(dir.join("f2"));
        let other = registry.make_temp_file(None, None).unwrap();

        let report = registry.run_cleanup();

        // f2 survives, so its parent cannot go either.
        assert!(fs.contains(dir.join("f2")));
        assert!(fs.contains(&dir));
        for i in [0, 1, 3, 4] {
            assert!(!fs.contains(dir.join(format!("f{i}"))));
        }
        assert!(!fs.contains(dir.join("nested")));
        assert!(!fs.contains(&other));

        let failed: Vec<_> = report.failures.iter().map(|f| f.path.clone()).collect();
        assert_eq!(failed, vec![dir.join("f2"), dir.clone()]);
        assert!(registry.resources().is_empty());
    }

    #[test]
    fn missing_entries_are_not_failures() {
        let (fs, registry) = mock_registry();
        let path = registry.make_temp_file(None, None).unwrap();
        fs.remove_file(&path).unwrap();

        let report = registry.run_cleanup();
        assert!(report.is_clean());
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn cleanup_guard_is_installed_once() {
        let (fs, registry) = mock_registry();
        let path = registry.make_temp_file(None, None).unwrap();

        let guard = registry.install_cleanup();
        assert!(guard.is_some());
        assert!(registry.install_cleanup().is_none());

        drop(guard);
        assert!(!fs.contains(&path));
    }

    #[test]
    fn delete_only_touches_registered_paths() {
        let (fs, registry) = mock_registry();
        fs.add_file("/tmp/foreign", b"x".to_vec());
        assert!(!registry.delete(Path::new("/tmp/foreign")).unwrap());
        assert!(fs.contains("/tmp/foreign"));

        let path = registry.make_temp_file(None, None).unwrap();
        assert!(registry.delete(&path).unwrap());
        assert!(!fs.contains(&path));
        assert!(registry.resources().is_empty());
    }

    #[test]
    fn failed_delete_keeps_the_entry_for_cleanup() {
        let (fs, registry) = mock_registry();
        let path = registry.make_temp_file(None, None).unwrap();
        fs.deny_removal(&path);

        assert!(matches!(registry.delete(&path), Err(HarnessError::Io(_))));
        assert!(fs.contains(&path));
        let registered: Vec<_> = registry.resources().into_iter().map(|r| r.path).collect();
        assert_eq!(registered, vec![path.clone()]);

        // Still reported by the exit-time pass, not silently forgotten.
        let report = registry.run_cleanup();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, path);
    }

    #[test]
    fn creation_failure_is_reported() {
        let fs = MockFileSystem::new();
        let registry = ResourceRegistry::new(Arc::new(fs), "/missing");

        match registry.make_temp_dir(None, None) {
            Err(HarnessError::ResourceCreation { kind, dir, .. }) => {
                assert_eq!(kind, ResourceKind::Dir);
                assert_eq!(dir, PathBuf::from("/missing"));
            }
            other => panic!("expected ResourceCreation, got {other:?}"),
        }
        assert!(registry.resources().is_empty());
    }
}
