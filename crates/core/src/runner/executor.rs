//! Runner interface and shared types.
//!
//! Defines [`CommandRunner`], along with [`RunLimits`], [`ProcessResult`]
//! and [`RunError`].

use std::time::Duration;

/// Hard wall-clock limit for a single command (5 s).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Combined stdout + stderr cap for a single command (1 MiB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Bounds applied to every command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
    /// Maximum number of bytes captured across stdout and stderr together.
    pub max_output_bytes: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Why a command run did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The process could not be started.
    #[error("Failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on the running process failed.
    #[error("I/O error while running command: {0}")]
    Io(#[source] std::io::Error),

    /// The process ran to completion with a non-zero exit code.
    #[error("Command failed with exit code {exit_code}")]
    Failed { exit_code: i32 },

    /// The process was terminated by a signal it did not get from us.
    #[error("Command terminated by signal {signal}")]
    Signaled { signal: String },

    /// The deadline passed and the process was killed.
    #[error("Command timed out after {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },

    /// Combined output went over the cap and the process was killed.
    #[error("Command output exceeded {limit_bytes} bytes")]
    OutputLimitExceeded { limit_bytes: usize },
}

/// Everything observed about one command run.
///
/// `exit_code` is `None` when the process was terminated by a signal (or
/// never started). `error` is `None` only for a clean zero exit.
#[derive(Debug, Default)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    pub signal: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<RunError>,
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Result for a process that could not be spawned at all.
    pub fn spawn_failure(err: std::io::Error) -> Self {
        Self {
            error: Some(RunError::Spawn(err)),
            ..Self::default()
        }
    }
}

/// Runs a shell command string within [`RunLimits`].
///
/// Implementations never return a transport-level error: every failure
/// mode is folded into [`ProcessResult::error`].
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        command: &str,
        limits: &RunLimits,
    ) -> impl std::future::Future<Output = ProcessResult> + Send;
}

/// Conventional name for a Unix signal number (`9` -> `"SIGKILL"`).
pub fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        6 => "SIGABRT",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        other => return format!("SIG{other}"),
    };
    name.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
