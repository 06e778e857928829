use axum::{extract::State, http::HeaderMap, Json};

use crate::{
    api::{operator_from_headers, ApiError, ApiResult},
    db::repositories::OperatorRepository,
    state::AppState,
};
use pulse_types::{LoginRequest, LoginResponse, Operator};

/// POST /auth/login - Exchange an operator email for a session token.
///
/// Identity verification is the upstream provider's job; this server only
/// issues sessions for known operator accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }

    let repo = OperatorRepository::new(state.db.pool.clone());
    let operator = repo
        .get_by_email(payload.email.trim())
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("Unknown operator".to_string()))?;

    let session_token = state
        .session_manager
        .create_session(operator.id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(LoginResponse {
        operator,
        session_token,
    }))
}

/// POST /auth/logout - Delete the current session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = headers
        .get("X-Session-Token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    state
        .session_manager
        .delete_session(token)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// GET /auth/validate - Return the operator for a valid session.
pub async fn validate_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Operator>> {
    let operator_id = operator_from_headers(&state, &headers)?;

    let repo = OperatorRepository::new(state.db.pool.clone());
    let operator = repo
        .get_by_id(&operator_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Operator not found".to_string()))?;

    Ok(Json(operator))
}
