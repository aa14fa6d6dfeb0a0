//! Child supervision: stdin feeding, output capture, timeout and cancellation.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::cancel::Cancellation;

/// How long to keep draining pipes after the child is gone.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

pub enum Wait {
    Exited(std::process::ExitStatus),
    TimedOut,
    Cancelled,
}

pub struct Captured {
    pub wait: Wait,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Wait for `child` under `timeout` and `cancel`, killing it on either.
///
/// The child's process group is killed in every case so stray background
/// processes cannot outlive the run.
pub async fn supervise(
    mut child: Child,
    stdin: Option<&str>,
    timeout: Duration,
    cancel: &Cancellation,
) -> io::Result<Captured> {
    // Taken up front: tokio forgets the pid once the child is reaped.
    let pid = child.id();
    if let Some(mut pipe) = child.stdin.take() {
        let input = stdin.unwrap_or_default().to_owned();
        tokio::spawn(async move {
            // A child that exits without reading closes the pipe; not an error.
            let _ = pipe.write_all(input.as_bytes()).await;
        });
    }
    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let waited = tokio::select! {
        status = child.wait() => status.map(Wait::Exited),
        () = tokio::time::sleep(timeout) => Ok(Wait::TimedOut),
        () = cancel.cancelled() => Ok(Wait::Cancelled),
    };

    kill_group(pid);
    if !matches!(waited, Ok(Wait::Exited(_))) {
        let _ = child.start_kill();
        let _ = child.wait().await;
    }

    let wait = waited?;
    Ok(Captured {
        wait,
        stdout: drain(stdout).await,
        stderr: drain(stderr).await,
    })
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer).await;
        }
        buffer
    })
}

async fn drain(reader: JoinHandle<Vec<u8>>) -> Vec<u8> {
    let abort = reader.abort_handle();
    match tokio::time::timeout(DRAIN_GRACE, reader).await {
        Ok(Ok(buffer)) => buffer,
        Ok(Err(error)) => {
            tracing::warn!(%error, "output reader failed");
            Vec::new()
        }
        Err(_) => {
            abort.abort();
            tracing::warn!("output pipe still open after the child exited; dropping it");
            Vec::new()
        }
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    // ESRCH just means the group is already empty.
    if let Err(error) = killpg(Pid::from_raw(pid), Signal::SIGKILL)
        && error != nix::errno::Errno::ESRCH
    {
        tracing::debug!(pid, %error, "failed to kill process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}
