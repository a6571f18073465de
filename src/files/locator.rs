// src/files/locator.rs

use std::path::{Component, Path, PathBuf};

use tokio::fs::File;

use crate::errors::{HarnessError, Result};
use crate::files::{copy_temp_file, read_all};
use crate::temp::ResourceRegistry;

/// Finds test fixtures relative to an explicit root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    root: PathBuf,
}

impl ResourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Fixtures next to a crate's manifest, e.g.
    /// `ResourceLocator::for_manifest_dir(env!("CARGO_MANIFEST_DIR"), "tests/fixtures")`.
    pub fn for_manifest_dir(manifest_dir: impl AsRef<Path>, relative: impl AsRef<Path>) -> Self {
        Self::new(manifest_dir.as_ref().join(relative))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an existing resource file.
    ///
    /// Names must stay inside the root: absolute paths and `..` are treated
    /// as missing.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        let candidate = self.root.join(relative);

        if name.is_empty() || escapes || !candidate.is_file() {
            return Err(HarnessError::ResourceNotFound {
                name: name.to_string(),
                root: self.root.clone(),
            });
        }
        Ok(candidate)
    }

    pub async fn open(&self, name: &str) -> Result<File> {
        let path = self.path(name)?;
        Ok(File::open(path).await?)
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut file = self.open(name).await?;
        read_all(&mut file).await
    }

    /// Copy a resource into a registered temp file.
    pub async fn copy_to_temp(
        &self,
        registry: &ResourceRegistry,
        name: &str,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) -> Result<PathBuf> {
        let file = self.open(name).await?;
        copy_temp_file(registry, file, prefix, suffix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_files_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/foobar.txt"), b"foo").unwrap();

        let locator = ResourceLocator::new(dir.path());
        assert_eq!(locator.read("sub/foobar.txt").await.unwrap(), b"foo");
    }

    #[test]
    fn missing_and_escaping_names_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present"), b"x").unwrap();
        let locator = ResourceLocator::new(dir.path().join("inner"));
        std::fs::create_dir(locator.root()).unwrap();

        for name in ["notfound", "../present", "", "/etc/hostname"] {
            let err = locator.path(name).unwrap_err();
            assert!(
                err.to_string().starts_with("Unable to find resource"),
                "unexpected error for {name:?}: {err}"
            );
        }
    }
}
