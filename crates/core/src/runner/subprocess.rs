//! Subprocess spawn, capture and deadline handling.
//!
//! [`run_command`] takes a fully built [`tokio::process::Command`], runs it
//! with stdin closed, and captures stdout/stderr concurrently against one
//! shared output budget. The child is placed in its own process group so
//! that a kill on timeout or overflow also reaches anything the shell forked.

use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::executor::{signal_name, ProcessResult, RunError, RunLimits};

/// Size of each read from a child's output pipe.
const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Spawn `cmd`, capture its output and enforce `limits`.
///
/// The caller sets the program and arguments; pipes, `kill_on_drop` and the
/// process group are configured here. Never fails: every failure mode ends
/// up in [`ProcessResult::error`].
pub async fn run_command(cmd: &mut Command, limits: &RunLimits) -> ProcessResult {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let deadline = Instant::now() + limits.timeout;

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return ProcessResult::spawn_failure(e),
    };
    let pgid = child.id();

    let budget = Arc::new(OutputBudget::new(limits.max_output_bytes));
    let stop = CancellationToken::new();

    let stdout_task = tokio::spawn(read_stream(
        child.stdout.take(),
        Arc::clone(&budget),
        stop.clone(),
        deadline,
    ));
    let stderr_task = tokio::spawn(read_stream(
        child.stderr.take(),
        Arc::clone(&budget),
        stop.clone(),
        deadline,
    ));

    let exit = tokio::select! {
        status = child.wait() => Exit::Exited(status),
        () = budget.exceeded() => Exit::OverLimit,
        () = tokio::time::sleep_until(deadline) => Exit::TimedOut,
    };

    let (status, mut error) = match exit {
        Exit::Exited(Ok(status)) => (Some(status), None),
        Exit::Exited(Err(e)) => (terminate(&mut child, pgid).await, Some(RunError::Io(e))),
        Exit::OverLimit => (
            terminate(&mut child, pgid).await,
            Some(RunError::OutputLimitExceeded {
                limit_bytes: limits.max_output_bytes,
            }),
        ),
        Exit::TimedOut => (
            terminate(&mut child, pgid).await,
            Some(RunError::TimedOut {
                timeout_ms: timeout_ms(limits),
            }),
        ),
    };
    if error.is_some() {
        stop.cancel();
    }

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    if error.is_none() && budget.is_exceeded() {
        error = Some(RunError::OutputLimitExceeded {
            limit_bytes: limits.max_output_bytes,
        });
    }
    if error.is_none() && !(stdout.complete && stderr.complete) {
        // The shell exited but something it forked kept the pipes open past
        // the deadline.
        kill_process_group(pgid);
        error = Some(RunError::TimedOut {
            timeout_ms: timeout_ms(limits),
        });
    }

    let (exit_code, signal) = status.map(describe_exit).unwrap_or((None, None));
    if error.is_none() {
        error = match (exit_code, &signal) {
            (Some(0), _) => None,
            (Some(code), _) => Some(RunError::Failed { exit_code: code }),
            (None, Some(sig)) => Some(RunError::Signaled {
                signal: sig.clone(),
            }),
            (None, None) => Some(RunError::Failed { exit_code: -1 }),
        };
    }

    ProcessResult {
        exit_code,
        signal,
        stdout: String::from_utf8_lossy(&stdout.bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr.bytes).into_owned(),
        error,
    }
}

enum Exit {
    Exited(std::io::Result<ExitStatus>),
    OverLimit,
    TimedOut,
}

/// Bytes read from one pipe, and whether the pipe reached EOF.
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    complete: bool,
}

/// Byte allowance shared by the stdout and stderr readers.
struct OutputBudget {
    limit: usize,
    used: AtomicUsize,
    exceeded: CancellationToken,
}

impl OutputBudget {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
            exceeded: CancellationToken::new(),
        }
    }

    /// Charge `n` freshly read bytes. Returns how many of them fit; anything
    /// short of `n` means the budget is now exceeded.
    fn charge(&self, n: usize) -> usize {
        let before = self.used.fetch_add(n, Ordering::SeqCst);
        let allowed = self.limit.saturating_sub(before).min(n);
        if allowed < n {
            self.exceeded.cancel();
        }
        allowed
    }

    fn is_exceeded(&self) -> bool {
        self.exceeded.is_cancelled()
    }

    async fn exceeded(&self) {
        self.exceeded.cancelled().await;
    }
}

/// Read a pipe until EOF, overflow, `stop`, or `deadline`.
async fn read_stream<R: AsyncRead + Unpin>(
    handle: Option<R>,
    budget: Arc<OutputBudget>,
    stop: CancellationToken,
    deadline: Instant,
) -> Captured {
    let mut captured = Captured::default();
    let Some(mut reader) = handle else {
        captured.complete = true;
        return captured;
    };

    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let read = tokio::select! {
            () = stop.cancelled() => break,
            () = tokio::time::sleep_until(deadline) => break,
            read = reader.read(&mut chunk) => read,
        };
        match read {
            Ok(0) => {
                captured.complete = true;
                break;
            }
            Ok(n) => {
                let allowed = budget.charge(n);
                captured.bytes.extend_from_slice(&chunk[..allowed]);
                if allowed < n {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Output pipe read failed");
                captured.complete = true;
                break;
            }
        }
    }
    captured
}

/// Kill the child's process group and reap the child.
async fn terminate(child: &mut Child, pgid: Option<u32>) -> Option<ExitStatus> {
    kill_process_group(pgid);
    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "start_kill failed, child likely already exited");
    }
    match child.wait().await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to reap killed child");
            None
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: Option<u32>) {
    let Some(pid) = pgid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    // SAFETY: kill(2) takes plain integers and touches no memory we own.
    let rc = unsafe { libc::kill(-pid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            pgid = pid,
            error = %std::io::Error::last_os_error(),
            "Process group kill failed"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: Option<u32>) {}

#[cfg(unix)]
fn describe_exit(status: ExitStatus) -> (Option<i32>, Option<String>) {
    use std::os::unix::process::ExitStatusExt;
    (status.code(), status.signal().map(signal_name))
}

#[cfg(not(unix))]
fn describe_exit(status: ExitStatus) -> (Option<i32>, Option<String>) {
    (status.code(), None)
}

fn timeout_ms(limits: &RunLimits) -> u64 {
    u64::try_from(limits.timeout.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
