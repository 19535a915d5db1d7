#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cmdgate_api::config::ServerConfig;
use cmdgate_api::router::build_app_router;
use cmdgate_api::state::AppState;
use cmdgate_core::registry::CommandRegistry;
use cmdgate_core::runner::{RunLimits, ShellRunner};

/// Registry used by integration tests.
///
/// `uptime` is mapped to a plain `echo` so tests do not depend on procps
/// being installed; the other entries cover the failure paths.
pub fn test_registry() -> CommandRegistry {
    [
        ("uptime", "echo ' 10:00:00 up 1 day,  1 user,  load average: 0.00, 0.00, 0.00'"),
        ("broken", "definitely-not-a-real-binary-xyz"),
        ("exit3", "echo partial; echo oops >&2; exit 3"),
        ("flood", "yes"),
        ("slow", "sleep 30"),
    ]
    .into_iter()
    .collect()
}

/// Build a test `ServerConfig` with the given admin key and tight limits so
/// timeout and overflow tests finish quickly.
pub fn test_config(admin_api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        admin_api_key: admin_api_key.map(str::to_string),
        run_limits: RunLimits {
            timeout: Duration::from_millis(1500),
            max_output_bytes: 64 * 1024,
        },
    }
}

/// Build the full application router exactly as `main.rs` does, with no
/// admin key configured.
pub fn build_test_app() -> Router {
    build_test_app_with_key(None)
}

pub fn build_test_app_with_key(admin_api_key: Option<&str>) -> Router {
    let state = AppState::new(
        test_config(admin_api_key),
        test_registry(),
        ShellRunner::default(),
    );
    build_app_router(state)
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn get_with_key(app: Router, uri: &str, key: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
