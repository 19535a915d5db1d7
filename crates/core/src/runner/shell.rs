//! `sh -c` command runner.

use std::path::PathBuf;
use std::time::Instant;

use super::executor::{CommandRunner, ProcessResult, RunLimits};
use super::subprocess;

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs command strings through `<shell> -c`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &std::path::Path {
        &self.shell
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, limits: &RunLimits) -> ProcessResult {
        let mut cmd = tokio::process::Command::new(&self.shell);
        cmd.arg("-c").arg(command);

        let start = Instant::now();
        let result = subprocess::run_command(&mut cmd, limits).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result.error {
            None => tracing::info!(
                command,
                duration_ms,
                stdout_bytes = result.stdout.len(),
                "Command completed"
            ),
            Some(err) => tracing::warn!(
                command,
                duration_ms,
                exit_code = ?result.exit_code,
                signal = ?result.signal,
                error = %err,
                "Command failed"
            ),
        }

        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
