//! Static informational page served at `/` and `/index.html`.

use axum::extract::State;
use axum::response::Html;
use axum::{routing::any, Router};

use crate::state::AppState;

/// Version string shown on the info page.
pub const VERSION: &str = concat!("cmdgate/", env!("CARGO_PKG_VERSION"));

/// `<os>-<arch>` of the running binary, e.g. `linux-x86_64`.
pub fn platform() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let commands: String = state
        .registry
        .names()
        .map(|name| format!("<li><code>{name}</code></li>"))
        .collect();

    Html(render_index(
        state.config.port,
        state.started_at.elapsed().as_secs(),
        &commands,
    ))
}

fn render_index(port: u16, uptime_secs: u64, command_items: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>cmdgate</title>
</head>
<body>
  <h1>cmdgate</h1>
  <p>Command gateway is running.</p>
  <ul>
    <li>Version: {version}</li>
    <li>Port: {port}</li>
    <li>Platform: {platform}</li>
    <li>Uptime: {uptime_secs} seconds</li>
  </ul>
  <h2>Endpoints</h2>
  <ul>
    <li><code>GET /health</code> - health probe</li>
    <li><code>GET /cmd?command=&lt;name&gt;</code> - run an allowed command</li>
  </ul>
  <h2>Allowed commands</h2>
  <ul>
    {command_items}
  </ul>
</body>
</html>
"#,
        version = VERSION,
        platform = platform(),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", any(index))
        .route("/index.html", any(index))
}
