//! Shared-secret extractor for the command endpoint.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::AppError;
use crate::state::AppState;

/// Request header carrying the admin key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request passed the admin key check.
///
/// When no admin key is configured every request passes. Handlers that need
/// to order this check after their own validation take
/// `Result<ApiKeyAuth, AppError>` and apply `?` where appropriate.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(&parts.headers, state.config.admin_api_key.as_deref())
    }
}

/// Compare the `x-api-key` header against `expected`, exact match only.
pub fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<ApiKeyAuth, AppError> {
    let Some(expected) = expected else {
        return Ok(ApiKeyAuth);
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if provided == expected {
        Ok(ApiKeyAuth)
    } else {
        Err(AppError::Unauthorized)
    }
}
