// src/fs/mock.rs

use super::{EntryKind, FileSystem};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem with failure injection.
///
/// Paths are taken literally (no normalisation); `canonicalize` is the
/// identity for existing entries.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
    undeletable: Arc<Mutex<HashSet<PathBuf>>>,
    counter: Arc<AtomicU64>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_parents(&mut entries, &path);
        entries.insert(path, MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_parents(&mut entries, &path);
        entries.insert(path, MockEntry::Dir);
    }

    /// Make every removal of `path` fail with `PermissionDenied`.
    pub fn deny_removal(&self, path: impl AsRef<Path>) {
        self.undeletable
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.lock().unwrap().contains_key(path.as_ref())
    }

    fn ensure_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            entries.entry(dir.to_path_buf()).or_insert(MockEntry::Dir);
            parent = dir.parent();
        }
    }

    fn children(entries: &BTreeMap<PathBuf, MockEntry>, dir: &Path) -> Vec<PathBuf> {
        entries
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect()
    }

    fn check_removable(&self, path: &Path) -> io::Result<()> {
        if self.undeletable.lock().unwrap().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("removal of {path:?} denied"),
            ));
        }
        Ok(())
    }

    fn create_temp_entry(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        entry: MockEntry,
    ) -> io::Result<PathBuf> {
        let mut entries = self.entries.lock().unwrap();
        if entries.get(dir) != Some(&MockEntry::Dir) {
            return Err(not_found(dir));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("{prefix}{n:06}{suffix}"));
        entries.insert(path.clone(), entry);
        Ok(path)
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path:?} not found"))
}

impl FileSystem for MockFileSystem {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        match self.entries.lock().unwrap().get(path)? {
            MockEntry::File(_) => Some(EntryKind::File),
            MockEntry::Dir => Some(EntryKind::Dir),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir) => Ok(Self::children(&entries, path)),
            Some(MockEntry::File(_)) => Err(io::Error::other(format!("{path:?} is not a directory"))),
            None => Err(not_found(path)),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check_removable(path)?;
        let mut entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(_)) => {
                entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(io::Error::other(format!("{path:?} is a directory"))),
            None => Err(not_found(path)),
        }
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.check_removable(path)?;
        let mut entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir) => {
                if !Self::children(&entries, path).is_empty() {
                    return Err(io::Error::other(format!("{path:?} is not empty")));
                }
                entries.remove(path);
                Ok(())
            }
            Some(MockEntry::File(_)) => Err(io::Error::other(format!("{path:?} is not a directory"))),
            None => Err(not_found(path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        if self.entries.lock().unwrap().contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(not_found(path))
        }
    }

    fn create_temp_file(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf> {
        self.create_temp_entry(dir, prefix, suffix, MockEntry::File(Vec::new()))
    }

    fn create_temp_dir(&self, dir: &Path, prefix: &str, suffix: &str) -> io::Result<PathBuf> {
        self.create_temp_entry(dir, prefix, suffix, MockEntry::Dir)
    }
}
