// src/exec/launcher.rs

//! Process launcher.
//!
//! Every launch spawns the child plus two Tokio drain tasks, one per output
//! pipe. Each drain owns its sink for the duration of the copy and hands it
//! back through its `JoinHandle`, so [`ProcessHandle::wait_for`] can only
//! report an exit code after both pipes were fully consumed.

use std::future::Future;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ExecConfig;
use crate::errors::{HarnessError, Result};
use crate::exec::command::CommandSpec;
use crate::exec::copier::{CloseMode, StreamCopier};
use crate::exec::wait::ProcessWait;

/// Launch settings shared by all processes started through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launcher {
    copier: StreamCopier,
    announce: bool,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::from_config(&ExecConfig::default())
    }
}

impl Launcher {
    pub fn from_config(cfg: &ExecConfig) -> Self {
        Self {
            copier: StreamCopier::new(cfg.buffer_size, CloseMode::KeepOpen),
            announce: cfg.announce,
        }
    }

    /// Start `command` and drain its stdout/stderr into `out`/`err`.
    ///
    /// Must be called from within a Tokio runtime. The sinks are flushed but
    /// never closed by the drains. A spawn failure is returned before any
    /// drain task exists.
    pub fn launch<O, E>(&self, command: &CommandSpec, out: O, err: E) -> Result<ProcessHandle<O, E>>
    where
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        if self.announce {
            info!(command = %command, "executing command");
        } else {
            debug!(command = %command, "executing command");
        }

        let mut cmd = command.to_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| HarnessError::Launch {
            command: command.to_string(),
            source,
        })?;

        let pid = child.id();
        let stdout = spawn_drain(self.copier, "stdout", pid, child.stdout.take(), out);
        let stderr = spawn_drain(self.copier, "stderr", pid, child.stderr.take(), err);

        Ok(ProcessHandle {
            command: command.clone(),
            child,
            stdout: Drain::new("stdout", stdout),
            stderr: Drain::new("stderr", stderr),
            exit_code: None,
        })
    }

    /// Launch with the parent's own stdout/stderr as sinks.
    pub fn launch_inherited(
        &self,
        command: &CommandSpec,
    ) -> Result<ProcessHandle<tokio::io::Stdout, tokio::io::Stderr>> {
        self.launch(command, tokio::io::stdout(), tokio::io::stderr())
    }
}

/// [`Launcher::launch`] with default settings.
pub fn launch<O, E>(command: &CommandSpec, out: O, err: E) -> Result<ProcessHandle<O, E>>
where
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    Launcher::default().launch(command, out, err)
}

/// [`Launcher::launch_inherited`] with default settings.
pub fn launch_inherited(
    command: &CommandSpec,
) -> Result<ProcessHandle<tokio::io::Stdout, tokio::io::Stderr>> {
    Launcher::default().launch_inherited(command)
}

fn spawn_drain<R, W>(
    copier: StreamCopier,
    stream: &'static str,
    pid: Option<u32>,
    source: Option<R>,
    mut sink: W,
) -> JoinHandle<W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut source) = source else {
            return sink;
        };
        match copier.copy(&mut source, &mut sink).await {
            Ok(bytes) => debug!(?pid, stream, bytes, "drain reached end of stream"),
            Err(e) => warn!(?pid, stream, error = %e, "I/O failure while draining child output"),
        }
        sink
    })
}

/// One drain task plus what it left behind once joined.
///
/// The join handle stays in place until it resolves, so a `wait_for` that is
/// dropped mid-join can be resumed by the next call.
struct Drain<W> {
    stream: &'static str,
    task: Option<JoinHandle<W>>,
    sink: Option<W>,
    failure: Option<String>,
}

impl<W> Drain<W> {
    fn new(stream: &'static str, task: JoinHandle<W>) -> Self {
        Self {
            stream,
            task: Some(task),
            sink: None,
            failure: None,
        }
    }

    async fn join(&mut self) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        let joined = task.await;
        self.task = None;
        match joined {
            Ok(sink) => self.sink = Some(sink),
            Err(e) => self.failure = Some(e.to_string()),
        }
    }
}

/// A running (or finished) child whose output goes to caller-owned sinks.
pub struct ProcessHandle<O, E> {
    command: CommandSpec,
    child: Child,
    stdout: Drain<O>,
    stderr: Drain<E>,
    exit_code: Option<i32>,
}

impl<O, E> ProcessHandle<O, E>
where
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Give back the sinks; `None` until `wait_for` succeeded.
    pub fn into_sinks(mut self) -> Option<(O, E)> {
        self.take_sinks()
    }

    pub(crate) fn take_sinks(&mut self) -> Option<(O, E)> {
        if self.exit_code.is_none() {
            return None;
        }
        match (self.stdout.sink.take(), self.stderr.sink.take()) {
            (Some(out), Some(err)) => Some((out, err)),
            _ => None,
        }
    }

    async fn wait_inner(&mut self) -> Result<i32> {
        if let Some(code) = self.exit_code {
            return Ok(code);
        }

        // Both joins and `Child::wait` are safe to abandon and retry.
        self.stdout.join().await;
        self.stderr.join().await;

        let status = self.child.wait().await.map_err(|source| HarnessError::Wait {
            command: self.command.to_string(),
            source,
        })?;
        let code = exit_code_of(status);
        debug!(command = %self.command, exit_code = code, success = status.success(), "process exited");

        let failed = [
            (self.stdout.stream, self.stdout.failure.take()),
            (self.stderr.stream, self.stderr.failure.take()),
        ];
        for (stream, failure) in failed {
            if let Some(message) = failure {
                return Err(HarnessError::DrainJoin {
                    command: self.command.to_string(),
                    stream,
                    message,
                });
            }
        }

        self.exit_code = Some(code);
        Ok(code)
    }
}

impl<O, E> ProcessWait for ProcessHandle<O, E>
where
    O: Send + 'static,
    E: Send + 'static,
{
    fn wait_for(&mut self) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        Box::pin(self.wait_inner())
    }

    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn start_kill(&mut self) -> Result<()> {
        self.child.start_kill()?;
        Ok(())
    }

    fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

/// Native exit code; `128 + signal` for a signal-terminated Unix child.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
