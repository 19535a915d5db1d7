//! `/cmd` -- run one of the registered commands.
//!
//! Checks run in a fixed order: method, admin key, `command` parameter,
//! registry membership. A command that runs but fails is still a `200`; the
//! failure is described inside the body.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Method;
use axum::{routing::any, Json, Router};
use cmdgate_core::runner::{CommandRunner, ProcessResult};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::api_key::ApiKeyAuth;
use crate::state::AppState;

/// Query parameter naming the command to run.
pub const COMMAND_PARAM: &str = "command";

/// Body of every `200` from `/cmd`.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Public name the caller asked for.
    pub command: String,
    pub allowed: bool,
    /// Present only when the command did not succeed.
    #[serde(flatten)]
    pub failure: Option<CommandFailure>,
    pub stdout: String,
    pub stderr: String,
}

/// Failure fields. `exitCode` and `signal` serialize as `null` when absent.
#[derive(Debug, Serialize)]
pub struct CommandFailure {
    pub error: String,
    #[serde(rename = "exitCode")]
    pub exit_code: Option<i32>,
    pub signal: Option<String>,
}

impl CommandResponse {
    pub fn from_result(command: String, result: ProcessResult) -> Self {
        let failure = result.error.map(|err| CommandFailure {
            error: err.to_string(),
            exit_code: result.exit_code,
            signal: result.signal,
        });

        Self {
            command,
            allowed: true,
            failure,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}

/// ANY /cmd?command=<name>
async fn run_command(
    State(state): State<AppState>,
    method: Method,
    auth: Result<ApiKeyAuth, AppError>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<CommandResponse>> {
    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }
    auth?;

    let Query(params) =
        query.map_err(|e| AppError::Internal(format!("Malformed query string: {e}")))?;
    let name = params
        .into_iter()
        .find(|(key, _)| key == COMMAND_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingCommand)?;

    let Some(shell_command) = state.registry.resolve(&name) else {
        tracing::warn!(command = %name, "Rejected command not in registry");
        return Err(AppError::CommandNotAllowed);
    };

    tracing::info!(command = %name, shell_command, "Running command");
    let result = state
        .runner
        .run(shell_command, &state.config.run_limits)
        .await;

    Ok(Json(CommandResponse::from_result(name, result)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/cmd", any(run_command))
}

#[cfg(test)]
mod tests {
    use cmdgate_core::runner::RunError;

    use super::*;

    #[test]
    fn success_has_no_failure_fields() {
        let result = ProcessResult {
            exit_code: Some(0),
            stdout: "up 3 days\n".into(),
            ..ProcessResult::default()
        };
        let json = serde_json::to_value(CommandResponse::from_result("uptime".into(), result))
            .unwrap();

        assert_eq!(json["command"], "uptime");
        assert_eq!(json["allowed"], true);
        assert_eq!(json["stdout"], "up 3 days\n");
        assert_eq!(json["stderr"], "");
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("exitCode"));
        assert!(!obj.contains_key("signal"));
    }

    #[test]
    fn failure_serializes_nulls_explicitly() {
        let result = ProcessResult {
            exit_code: None,
            signal: Some("SIGKILL".into()),
            error: Some(RunError::TimedOut { timeout_ms: 5000 }),
            ..ProcessResult::default()
        };
        let json = serde_json::to_value(CommandResponse::from_result("slow".into(), result))
            .unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(json["error"], "Command timed out after 5000 ms");
        assert!(obj.contains_key("exitCode"));
        assert!(json["exitCode"].is_null());
        assert_eq!(json["signal"], "SIGKILL");
        assert_eq!(json["allowed"], true);
    }

    #[test]
    fn nonzero_exit_keeps_code_and_null_signal() {
        let result = ProcessResult {
            exit_code: Some(127),
            stderr: "sh: 1: nope: not found\n".into(),
            error: Some(RunError::Failed { exit_code: 127 }),
            ..ProcessResult::default()
        };
        let json = serde_json::to_value(CommandResponse::from_result("broken".into(), result))
            .unwrap();

        assert_eq!(json["exitCode"], 127);
        assert!(json.as_object().unwrap().contains_key("signal"));
        assert!(json["signal"].is_null());
        assert_eq!(json["stderr"], "sh: 1: nope: not found\n");
    }
}
