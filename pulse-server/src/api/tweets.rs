use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{TweetFilter, TweetRepository},
    state::AppState,
};
use pulse_types::{EngagementField, Sentiment, TweetPage};

#[derive(Deserialize)]
pub struct GetTweetsQuery {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    sentiment: Option<String>,
    /// Inclusive date bounds, YYYY-MM-DD.
    #[serde(default)]
    date_from: Option<String>,
    #[serde(default)]
    date_to: Option<String>,
    #[serde(default)]
    engagement_type: Option<String>,
    #[serde(default)]
    engagement_min: Option<i64>,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

/// GET /api/tweets - One page of filtered tweets, newest first.
///
/// Every filter is optional; supplied ones apply conjunctively. Blank
/// strings are treated the same as absent parameters.
pub async fn get_tweets(
    State(state): State<AppState>,
    Query(query): Query<GetTweetsQuery>,
) -> ApiResult<Json<TweetPage>> {
    let filter = build_filter(&query)?;

    let repo = TweetRepository::new(state.db.pool.clone());
    let page = repo
        .query_page(&filter, query.page)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(page))
}

fn build_filter(query: &GetTweetsQuery) -> Result<TweetFilter, ApiError> {
    let mut filter = TweetFilter {
        text: non_blank(&query.text),
        username: non_blank(&query.username),
        ..TweetFilter::default()
    };

    if let Some(label) = non_blank(&query.sentiment) {
        let sentiment = Sentiment::parse(&label).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown sentiment '{}'. Use Positive, Negative or Neutral",
                label
            ))
        })?;
        filter.sentiment = Some(sentiment);
    }

    if let Some(raw) = non_blank(&query.date_from) {
        let date = parse_date(&raw)?;
        filter.date_from = Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    if let Some(raw) = non_blank(&query.date_to) {
        // Widen to end of day so the bound stays inclusive
        let date = parse_date(&raw)?;
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        filter.date_to = Some(Utc.from_utc_datetime(&date.and_time(end_of_day)));
    }

    if let (Some(kind), Some(min)) = (non_blank(&query.engagement_type), query.engagement_min) {
        let field = EngagementField::parse(&kind).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unknown engagement type '{}'. Use likes, retweets or replies",
                kind
            ))
        })?;
        if min < 0 {
            return Err(ApiError::BadRequest(
                "Engagement minimum cannot be negative".to_string(),
            ));
        }
        filter.min_engagement = Some((field, min));
    }

    Ok(filter)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}'. Use YYYY-MM-DD", raw)))
}
