//! Bounded shell command execution.
//!
//! [`executor`] defines the [`CommandRunner`](executor::CommandRunner) trait
//! and the result/limit types, [`subprocess`] does the spawn + capture +
//! deadline handling, and [`shell`] is the `sh -c` runner used by the daemon.

pub mod executor;
pub mod shell;
pub mod subprocess;

pub use executor::{CommandRunner, ProcessResult, RunError, RunLimits};
pub use shell::ShellRunner;
