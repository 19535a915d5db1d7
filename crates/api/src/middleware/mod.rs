//! Request middleware and extractors.
//!
//! - [`cors::cors_headers`] -- Permissive CORS headers plus the `OPTIONS` short-circuit.
//! - [`api_key::ApiKeyAuth`] -- Shared-secret check for `/cmd`.

pub mod api_key;
pub mod cors;
