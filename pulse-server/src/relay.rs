//! Thin client over the external workflow-automation webhooks.
//!
//! The server's only role here is forwarding user input and returning the
//! endpoint's reply verbatim. Every failure is terminal for that single
//! call; there is no retry policy.

use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use pulse_types::{AgentTweet, AgentVideo, ChatReply, SmsResponse};

use crate::config::Webhooks;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("webhook endpoint for {0} is not configured")]
    NotConfigured(&'static str),
    #[error("webhook returned status {0}")]
    Status(StatusCode),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Stateless relay to the automation endpoints. Cheap to clone; shares one
/// connection pool through the inner client.
#[derive(Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    endpoints: Webhooks,
}

impl WebhookRelay {
    pub fn new(endpoints: Webhooks) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    /// GET the tweet search agent with a free-text query.
    pub async fn search_tweets(&self, message: &str) -> Result<Vec<AgentTweet>, RelayError> {
        let url = agent_url(&self.endpoints.tweet_agent_url, "tweet search", message)?;
        let response = self.client.get(url).send().await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// GET the video search agent with a free-text query.
    pub async fn search_videos(&self, message: &str) -> Result<Vec<AgentVideo>, RelayError> {
        let url = agent_url(&self.endpoints.video_agent_url, "video search", message)?;
        let response = self.client.get(url).send().await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// POST a chat message to the assistant webhook. The session id travels
    /// with every call; the relay itself keeps no conversation state.
    pub async fn send_chat(&self, message: &str, session_id: &str) -> Result<ChatReply, RelayError> {
        if self.endpoints.chat_url.is_empty() {
            return Err(RelayError::NotConfigured("chat"));
        }

        let body = json!({
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "context": "Pulse Sentiment Dashboard",
            "session_id": session_id,
        });

        let response = self.client.post(&self.endpoints.chat_url).json(&body).send().await?;
        let response = check_status(response)?;

        // The assistant replies with either a "response" or "message" key.
        let value: serde_json::Value = response.json().await?;
        let reply = value
            .get("response")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("The assistant returned an unreadable reply.")
            .to_string();

        Ok(ChatReply { reply })
    }

    /// POST an SMS broadcast request, returning the `{success, message}`
    /// reply verbatim.
    pub async fn send_sms(&self, message: &str) -> Result<SmsResponse, RelayError> {
        if self.endpoints.sms_url.is_empty() {
            return Err(RelayError::NotConfigured("sms"));
        }

        let body = json!({ "message": message });
        let response = self.client.post(&self.endpoints.sms_url).json(&body).send().await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }
}

fn agent_url(base: &str, name: &'static str, message: &str) -> Result<String, RelayError> {
    if base.is_empty() {
        return Err(RelayError::NotConfigured(name));
    }
    Ok(format!("{}?message={}", base, urlencoding::encode(message)))
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RelayError::Status(status))
    }
}
