pub mod auth;
pub mod error;
pub mod relay;
pub mod stats;
pub mod tweets;
pub mod voters;

pub use error::{ApiError, ApiResult};

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::state::AppState;

/// Extract the authenticated operator from the session token header.
pub(crate) fn operator_from_headers(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = headers
        .get("X-Session-Token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    state
        .authenticated_operator_from_token(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))
}
