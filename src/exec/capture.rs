// src/exec/capture.rs

//! Capturing launcher: stdout/stderr go into memory instead of live streams.

use std::future::Future;
use std::pin::Pin;

use crate::errors::{HarnessError, Result};
use crate::exec::command::CommandSpec;
use crate::exec::launcher::{Launcher, ProcessHandle};
use crate::exec::wait::ProcessWait;

/// Everything a finished capturing launch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout decoded as UTF-8, invalid sequences replaced.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr decoded as UTF-8, invalid sequences replaced.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Process handle whose output is only readable after `wait_for` returned.
///
/// There is no way to reach the child's streams: the accessors below return
/// [`HarnessError::NotFinished`] until the process has been waited for.
pub struct CapturingHandle {
    inner: ProcessHandle<Vec<u8>, Vec<u8>>,
    output: Option<CapturedOutput>,
}

impl CapturingHandle {
    pub fn command(&self) -> &CommandSpec {
        self.inner.command()
    }

    pub fn output(&self) -> Result<&CapturedOutput> {
        self.output
            .as_ref()
            .ok_or_else(|| HarnessError::NotFinished(self.command().to_string()))
    }

    pub fn stdout_bytes(&self) -> Result<&[u8]> {
        Ok(&self.output()?.stdout)
    }

    pub fn stderr_bytes(&self) -> Result<&[u8]> {
        Ok(&self.output()?.stderr)
    }

    pub fn stdout_text(&self) -> Result<String> {
        Ok(self.output()?.stdout_text())
    }

    pub fn stderr_text(&self) -> Result<String> {
        Ok(self.output()?.stderr_text())
    }

    pub fn into_output(self) -> Result<CapturedOutput> {
        match self.output {
            Some(output) => Ok(output),
            None => Err(HarnessError::NotFinished(self.inner.command().to_string())),
        }
    }

    async fn wait_inner(&mut self) -> Result<i32> {
        if let Some(output) = &self.output {
            return Ok(output.exit_code);
        }

        let exit_code = self.inner.wait_for().await?;
        let (stdout, stderr) = self.inner.take_sinks().ok_or_else(|| HarnessError::DrainJoin {
            command: self.inner.command().to_string(),
            stream: "stdout/stderr",
            message: "captured buffers were lost".to_string(),
        })?;

        self.output = Some(CapturedOutput {
            exit_code,
            stdout,
            stderr,
        });
        Ok(exit_code)
    }
}

impl ProcessWait for CapturingHandle {
    fn wait_for(&mut self) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        Box::pin(self.wait_inner())
    }

    fn id(&self) -> Option<u32> {
        self.inner.id()
    }

    fn start_kill(&mut self) -> Result<()> {
        self.inner.start_kill()
    }

    fn exit_code(&self) -> Option<i32> {
        self.output.as_ref().map(|o| o.exit_code)
    }
}

impl Launcher {
    /// Launch `command` with two in-memory sinks.
    pub fn launch_capturing(&self, command: &CommandSpec) -> Result<CapturingHandle> {
        let inner = self.launch(command, Vec::new(), Vec::new())?;
        Ok(CapturingHandle {
            inner,
            output: None,
        })
    }

    /// Launch capturing, wait, and return everything the process produced.
    pub async fn capture(&self, command: &CommandSpec) -> Result<CapturedOutput> {
        let mut handle = self.launch_capturing(command)?;
        handle.wait_for().await?;
        handle.into_output()
    }
}

/// [`Launcher::launch_capturing`] with default settings.
pub fn launch_capturing(command: &CommandSpec) -> Result<CapturingHandle> {
    Launcher::default().launch_capturing(command)
}

/// [`Launcher::capture`] with default settings.
pub async fn capture(command: &CommandSpec) -> Result<CapturedOutput> {
    Launcher::default().capture(command).await
}
