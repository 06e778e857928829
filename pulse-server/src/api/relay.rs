use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::{
    api::{operator_from_headers, ApiError, ApiResult},
    state::AppState,
};
use pulse_types::{AgentTweet, AgentVideo, ChatReply, ChatRequest, SmsBroadcastRequest, SmsResponse};

#[derive(Deserialize)]
pub struct SearchQuery {
    message: String,
}

/// GET /api/search/tweets - Forward a free-text query to the tweet agent.
pub async fn search_tweets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<AgentTweet>>> {
    operator_from_headers(&state, &headers)?;

    if query.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Search query cannot be empty".to_string()));
    }

    let results = state.relay.search_tweets(query.message.trim()).await?;
    Ok(Json(results))
}

/// GET /api/search/videos - Forward a free-text query to the video agent.
pub async fn search_videos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<AgentVideo>>> {
    operator_from_headers(&state, &headers)?;

    if query.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Search query cannot be empty".to_string()));
    }

    let results = state.relay.search_videos(query.message.trim()).await?;
    Ok(Json(results))
}

/// POST /api/chat - Relay a message to the assistant webhook.
///
/// The session token doubles as the conversation id so the assistant can
/// keep context per operator without this server holding any chat state.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    operator_from_headers(&state, &headers)?;

    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    // Safe: operator_from_headers already required the header
    let session_id = headers
        .get("X-Session-Token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let reply = state.relay.send_chat(payload.message.trim(), session_id).await?;
    Ok(Json(reply))
}

/// POST /api/sms - Trigger an SMS broadcast through the dispatch webhook.
/// The webhook's `{success, message}` reply is returned verbatim.
pub async fn send_sms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SmsBroadcastRequest>,
) -> ApiResult<Json<SmsResponse>> {
    operator_from_headers(&state, &headers)?;

    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("SMS message cannot be empty".to_string()));
    }

    let response = state.relay.send_sms(payload.message.trim()).await?;
    Ok(Json(response))
}
