// src/files/mod.rs

//! Whole-file helpers built on the stream copier.
//!
//! Everything here runs on the caller's task and returns copy failures
//! directly. Helpers that open a file themselves also close it.

pub mod locator;

pub use locator::ResourceLocator;

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncRead;

use crate::errors::Result;
use crate::exec::copier::{copy, copy_and_close};
use crate::temp::ResourceRegistry;

/// Read `reader` to its end.
pub async fn read_all<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut out = Vec::new();
    copy(reader, &mut out).await?;
    Ok(out)
}

pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(path.as_ref()).await?;
    read_all(&mut file).await
}

/// Create (or truncate) `path` and fill it from `reader`.
pub async fn copy_to_file<R>(reader: R, path: impl AsRef<Path>) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let file = File::create(path.as_ref()).await?;
    copy_and_close(reader, file).await
}

pub async fn write_file(path: impl AsRef<Path>, data: &[u8]) -> Result<u64> {
    copy_to_file(data, path).await
}

pub async fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<u64> {
    let input = File::open(src.as_ref()).await?;
    copy_to_file(input, dst).await
}

/// Allocate a registered temp file and fill it from `reader`.
pub async fn copy_temp_file<R>(
    registry: &ResourceRegistry,
    reader: R,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> Result<PathBuf>
where
    R: AsyncRead + Unpin,
{
    let path = registry.make_temp_file(prefix, suffix)?;
    copy_to_file(reader, &path).await?;
    Ok(path)
}
