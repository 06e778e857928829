use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::Sentiment;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// One monitored social-media post with its upstream classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: Uuid,
    /// Identifier assigned by the source platform.
    pub tweet_id: String,
    pub text: String,
    pub username: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub retweet_count: i64,
    pub reply_count: i64,
    pub quote_count: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    /// Absent when the upstream classifier has not labelled the post.
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub fact_checked: bool,
}

/// A (timestamp, label) pair, the only inputs the timeline aggregation needs.
#[derive(Debug, Clone, Copy)]
pub struct SentimentSample {
    pub created_at: DateTime<Utc>,
    pub sentiment: Sentiment,
}

/// One calendar-day bucket of the sentiment timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    /// Short display label, e.g. "Jan 01".
    pub label: String,
    /// Mean of the +1/-1/0 mapping, rounded to two decimals.
    pub average_sentiment: f64,
    pub tweet_count: usize,
}

/// Counts of each known label plus their total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub total: usize,
}

impl SentimentDistribution {
    /// Share of a count against the total, or `None` when nothing was
    /// labelled. Callers render "no data" instead of dividing by zero.
    pub fn percentage(&self, count: usize) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(count as f64 * 100.0 / self.total as f64)
        }
    }
}

/// Headline numbers for the overview cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tweets: i64,
    pub unique_users: i64,
    /// Mean sentiment across all labelled tweets, two decimals.
    pub average_sentiment: f64,
    pub fact_checked: i64,
    #[serde(with = "datetime_format")]
    pub refreshed_at: DateTime<Utc>,
}

/// One page of filtered query results plus the exact match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetPage {
    pub tweets: Vec<Tweet>,
    pub total_count: i64,
    pub page: u32,
    pub total_pages: u32,
}

/// One row of the voter roster bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub opted_in: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterUploadResponse {
    pub inserted: usize,
    /// Rows dropped for a missing phone number.
    pub skipped: usize,
}

/// Dashboard operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: Uuid,
    pub email: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

// Webhook payload shapes. Field names are fixed by the external automation
// endpoints and forwarded verbatim.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTweet {
    #[serde(rename = "Tweet by", default)]
    pub tweet_by: String,
    #[serde(rename = "Text Content", default)]
    pub text_content: String,
    #[serde(rename = "Reply Count", default)]
    pub reply_count: String,
    #[serde(rename = "Like Count", default)]
    pub like_count: String,
    #[serde(rename = "Tweet URL", default)]
    pub tweet_url: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Profile User Name", default)]
    pub profile_user_name: String,
    #[serde(rename = "Profile Description", default)]
    pub profile_description: String,
    #[serde(rename = "Sentiment", default)]
    pub sentiment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentVideo {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Channel", default)]
    pub channel: String,
    #[serde(rename = "Video URL", default)]
    pub video_url: String,
    #[serde(rename = "Publish Date", default)]
    pub publish_date: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Sentiment", default)]
    pub sentiment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SmsBroadcastRequest {
    pub message: String,
}

/// Verbatim reply shape of the SMS dispatch webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// Request/Response types for the API

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub operator: Operator,
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub enabled: bool,
    /// Seconds between automatic refreshes; ignored when disabled.
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStatus {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
