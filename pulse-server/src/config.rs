use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Assets {
    /// Directory holding the built dashboard frontend.
    pub dir: String,
}

/// External automation endpoints the server relays to.
#[derive(Debug, Clone, Deserialize)]
pub struct Webhooks {
    pub chat_url: String,
    pub tweet_agent_url: String,
    pub video_agent_url: String,
    pub sms_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub assets: Assets,
    pub webhooks: Webhooks,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in pulse-server directory (for development)
        let dev_path = PathBuf::from("pulse-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        // 2. Defaults, then environment variable overrides (highest priority).
        // Default to 0.0.0.0 for deployment; override with HOST locally.
        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.path", "pulse.db")?
            .set_default("assets.dir", "build")?
            .set_default("webhooks.chat_url", "")?
            .set_default("webhooks.tweet_agent_url", "")?
            .set_default("webhooks.video_agent_url", "")?
            .set_default("webhooks.sms_url", "")?;

        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(dir) = std::env::var("ASSETS_DIR") {
            builder = builder.set_override("assets.dir", dir)?;
        }
        if let Ok(url) = std::env::var("CHAT_WEBHOOK_URL") {
            builder = builder.set_override("webhooks.chat_url", url)?;
        }
        if let Ok(url) = std::env::var("TWEET_AGENT_URL") {
            builder = builder.set_override("webhooks.tweet_agent_url", url)?;
        }
        if let Ok(url) = std::env::var("VIDEO_AGENT_URL") {
            builder = builder.set_override("webhooks.video_agent_url", url)?;
        }
        if let Ok(url) = std::env::var("SMS_WEBHOOK_URL") {
            builder = builder.set_override("webhooks.sms_url", url)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
