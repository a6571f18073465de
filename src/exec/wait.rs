// src/exec/wait.rs

//! The capability shared by both handle variants.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// A launched process that can be waited on and terminated.
///
/// Implemented by [`super::ProcessHandle`] (caller-supplied sinks) and
/// [`super::CapturingHandle`] (in-memory sinks).
pub trait ProcessWait: Send {
    /// Wait until both output drains reached end-of-stream, then until the
    /// child exits, and return its exit code.
    ///
    /// Calling it again after completion returns the same code.
    fn wait_for(&mut self) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>>;

    /// OS process id, `None` once the child has been reaped.
    fn id(&self) -> Option<u32>;

    /// Ask the OS to terminate the child without waiting for it.
    ///
    /// This is the only way to cancel: the child's pipes close, the drains
    /// finish, and a pending `wait_for` returns.
    fn start_kill(&mut self) -> Result<()>;

    /// Exit code, if `wait_for` already completed.
    fn exit_code(&self) -> Option<i32>;
}
