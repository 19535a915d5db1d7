use std::sync::Arc;
use std::time::Instant;

use cmdgate_core::registry::CommandRegistry;
use cmdgate_core::runner::ShellRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Everything in here is read-only after startup, so cloning per request is
/// just a handful of `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Commands `/cmd` is allowed to run.
    pub registry: Arc<CommandRegistry>,
    /// Process runner used by `/cmd`.
    pub runner: Arc<ShellRunner>,
    /// When the state was built; uptime is measured from here.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: CommandRegistry, runner: ShellRunner) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            runner: Arc::new(runner),
            started_at: Instant::now(),
        }
    }

    /// Production state: builtin registry and the default `/bin/sh` runner.
    pub fn from_config(config: ServerConfig) -> Self {
        Self::new(config, CommandRegistry::builtin(), ShellRunner::default())
    }

    pub fn uptime_secs_f64(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
