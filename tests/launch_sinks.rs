mod common;
use crate::common::{ShellScript, init_tracing, payload, with_timeout};

use procharness::exec::{Launcher, launch, launch_inherited};
use procharness::config::ExecConfig;
use procharness::{CommandSpec, ProcessWait};

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::AsyncWrite;

/// Accepts `limit` bytes, then fails every write.
struct FailingSink {
    accepted: Vec<u8>,
    limit: usize,
}

impl FailingSink {
    fn new(limit: usize) -> Self {
        Self { accepted: Vec::new(), limit }
    }
}

impl AsyncWrite for FailingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let room = self.limit - self.accepted.len();
        if room == 0 {
            return Poll::Ready(Err(io::Error::other("sink is full")));
        }
        let n = room.min(buf.len());
        self.accepted.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn caller_sinks_are_returned_after_wait() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let err_path = dir.path().join("stderr.log");
    let err_file = tokio::fs::File::create(&err_path).await.unwrap();

    let cmd = ShellScript::new()
        .stdout("to memory")
        .stderr("to file")
        .exit(1)
        .build();
    let mut handle = launch(&cmd, Vec::new(), err_file).unwrap();
    let code = with_timeout(handle.wait_for()).await.unwrap();
    assert_eq!(code, 1);
    assert_eq!(handle.exit_code(), Some(1));

    let (out, err_file) = handle.into_sinks().expect("sinks after wait");
    drop(err_file);
    assert_eq!(out, b"to memory");
    assert_eq!(std::fs::read(&err_path).unwrap(), b"to file");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sinks_are_not_returned_before_wait() {
    let cmd = CommandSpec::new("sleep").arg("5");
    let mut handle = launch(&cmd, Vec::new(), Vec::new()).unwrap();
    handle.start_kill().unwrap();
    // Not waited yet: nothing to hand back.
    assert!(handle.into_sinks().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn small_buffers_still_copy_everything() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let data = payload(100_000);
    std::fs::write(&input, &data).unwrap();

    let launcher = Launcher::from_config(&ExecConfig {
        buffer_size: 7,
        announce: false,
    });
    let cmd = ShellScript::new().cat(&input).build();
    let mut handle = launcher.launch(&cmd, Vec::new(), Vec::new()).unwrap();
    with_timeout(handle.wait_for()).await.unwrap();

    let (out, err) = handle.into_sinks().unwrap();
    assert_eq!(out, data);
    assert!(err.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn inherited_mode_reports_exit_code() {
    init_tracing();
    let cmd = ShellScript::new().stdout("inherited\n").exit(4).build();
    let mut handle = launch_inherited(&cmd).unwrap();

    assert_eq!(with_timeout(handle.wait_for()).await.unwrap(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn both_handle_kinds_share_the_wait_capability() {
    async fn finish(handle: &mut dyn ProcessWait) -> i32 {
        handle.wait_for().await.unwrap()
    }

    let cmd = ShellScript::new().exit(5).build();
    let mut plain = launch(&cmd, Vec::new(), Vec::new()).unwrap();
    let mut capturing = procharness::exec::launch_capturing(&cmd).unwrap();

    assert_eq!(with_timeout(finish(&mut plain)).await, 5);
    assert_eq!(with_timeout(finish(&mut capturing)).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_sink_does_not_hide_the_exit_code() {
    init_tracing();
    // 100 bytes fit in the pipe in a single write, so the child never
    // sees the reader go away.
    let cmd = ShellScript::new().stdout(&"x".repeat(100)).exit(3).build();
    let mut handle = launch(&cmd, FailingSink::new(10), Vec::new()).unwrap();

    let code = with_timeout(handle.wait_for()).await.unwrap();
    assert_eq!(code, 3);

    let (out, err) = handle.into_sinks().expect("sinks after wait");
    assert_eq!(out.accepted, b"x".repeat(10));
    assert!(err.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abandoned_wait_still_joins_the_drains() {
    init_tracing();
    // The background writer keeps stdout open after the shell exits.
    let cmd = CommandSpec::new("sh")
        .arg("-c")
        .arg("(sleep 1; printf late) & sleep 0.3; exit 0");
    let mut handle = launch(&cmd, Vec::new(), Vec::new()).unwrap();

    let first = tokio::time::timeout(Duration::from_millis(50), handle.wait_for()).await;
    assert!(first.is_err());
    assert_eq!(handle.exit_code(), None);

    let code = with_timeout(handle.wait_for()).await.unwrap();
    assert_eq!(code, 0);

    let (out, err) = handle.into_sinks().expect("sinks after wait");
    assert_eq!(out, b"late");
    assert!(err.is_empty());
}
