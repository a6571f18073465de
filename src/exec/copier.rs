// src/exec/copier.rs

//! Byte pump from one async reader to one async writer.
//!
//! Drain tasks use [`CloseMode::KeepOpen`] so the caller's sinks (e.g. the
//! parent's own stdout) survive the child. File helpers that open both ends
//! themselves use [`CloseMode::Close`].

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::{HarnessError, Result};

pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// What happens to the sink once the source reaches end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseMode {
    /// Flush the sink and leave it usable.
    #[default]
    KeepOpen,
    /// Shut the sink down, even if the copy failed.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCopier {
    buffer_size: usize,
    close: CloseMode,
}

impl Default for StreamCopier {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, CloseMode::KeepOpen)
    }
}

impl StreamCopier {
    /// A zero `buffer_size` is bumped to one byte.
    pub fn new(buffer_size: usize, close: CloseMode) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
            close,
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn close_mode(&self) -> CloseMode {
        self.close
    }

    pub fn with_close_mode(self, close: CloseMode) -> Self {
        Self { close, ..self }
    }

    /// Copy until `reader` reports end-of-stream; returns the bytes copied.
    pub async fn copy<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let pumped = self.pump(reader, writer).await;
        let finished = match self.close {
            CloseMode::KeepOpen => writer.flush().await,
            CloseMode::Close => writer.shutdown().await,
        };

        // A copy error wins over the error from flushing/closing.
        let copied = pumped.map_err(HarnessError::Copy)?;
        finished.map_err(HarnessError::Copy)?;
        Ok(copied)
    }

    async fn pump<R, W>(&self, reader: &mut R, writer: &mut W) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total = 0u64;
        loop {
            let read = match reader.read(&mut buffer).await {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            writer.write_all(&buffer[..read]).await?;
            total += read as u64;
        }
    }
}

/// Copy with the default buffer, leaving `writer` open.
pub async fn copy<R, W>(reader: &mut R, writer: &mut W) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    StreamCopier::default().copy(reader, writer).await
}

/// Copy with the default buffer, then close both ends.
pub async fn copy_and_close<R, W>(mut reader: R, mut writer: W) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let copier = StreamCopier::default().with_close_mode(CloseMode::Close);
    let result = copier.copy(&mut reader, &mut writer).await;
    drop(reader);
    result
}
