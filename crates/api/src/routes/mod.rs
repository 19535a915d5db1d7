pub mod cmd;
pub mod health;
pub mod home;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;

use crate::state::AppState;

/// All routes, mounted at the root.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(health::router())
        .merge(cmd::router())
}

/// Fallback for every unrouted path: `404 text/plain` `Not Found`.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
