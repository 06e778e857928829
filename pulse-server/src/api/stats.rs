use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;

use crate::{
    analytics,
    api::{operator_from_headers, ApiError, ApiResult},
    db::repositories::TweetRepository,
    state::AppState,
};
use pulse_types::{
    DashboardStats, ScheduleRequest, ScheduleStatus, SentimentDistribution, TimelinePoint,
};

/// GET /api/stats - Headline numbers for the overview cards.
///
/// Serves the cached snapshot when one exists; computes on demand otherwise.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    if let Some(stats) = state.scheduler.cache().latest() {
        return Ok(Json(stats));
    }

    let stats = state
        .scheduler
        .refresh_now()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    match stats.or_else(|| state.scheduler.cache().latest()) {
        Some(stats) => Ok(Json(stats)),
        // A concurrent first refresh is still running and nothing is cached yet
        None => Err(ApiError::InternalError(
            "Stats are being computed, retry shortly".to_string(),
        )),
    }
}

/// POST /api/stats/refresh - Manually refresh the cached snapshot.
pub async fn refresh_stats(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let refreshed = state
        .scheduler
        .refresh_now()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "refreshed": refreshed.is_some(),
        "stats": refreshed.or_else(|| state.scheduler.cache().latest()),
    })))
}

/// PUT /api/stats/schedule - Enable, disable or retime the auto-refresh task.
pub async fn update_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScheduleRequest>,
) -> ApiResult<Json<ScheduleStatus>> {
    operator_from_headers(&state, &headers)?;

    if payload.enabled {
        let interval_secs = payload.interval_secs.unwrap_or(300);
        if interval_secs < 10 {
            return Err(ApiError::BadRequest(
                "Refresh interval must be at least 10 seconds".to_string(),
            ));
        }
        state.scheduler.start(Duration::from_secs(interval_secs));
    } else {
        state.scheduler.stop();
    }

    Ok(Json(state.scheduler.status()))
}

/// GET /api/stats/schedule - Current auto-refresh status.
pub async fn get_schedule(State(state): State<AppState>) -> ApiResult<Json<ScheduleStatus>> {
    Ok(Json(state.scheduler.status()))
}

#[derive(Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    30
}

/// GET /api/stats/timeline - Daily mean sentiment over the trailing window.
///
/// Days without any labelled tweet are omitted; an empty window yields an
/// empty array, not an error.
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<Vec<TimelinePoint>>> {
    if query.days == 0 || query.days > 365 {
        return Err(ApiError::BadRequest(
            "Timeline window must be between 1 and 365 days".to_string(),
        ));
    }

    let to = Utc::now();
    let from = to - ChronoDuration::days(query.days as i64);

    let repo = TweetRepository::new(state.db.pool.clone());
    let samples = repo
        .sentiment_samples(from, to)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(analytics::sentiment_timeline(&samples)))
}

/// GET /api/stats/distribution - Counts of each sentiment label.
pub async fn get_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<SentimentDistribution>> {
    let repo = TweetRepository::new(state.db.pool.clone());
    let labels = repo
        .all_sentiments()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(analytics::sentiment_distribution(&labels)))
}
