mod analytics;
mod api;
mod config;
mod db;
mod refresh;
mod relay;
mod roster;
mod session;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use state::AppState;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = config::Settings::new().expect("Failed to load settings");

    // Initialize database
    let db = db::Database::new(&settings.database.path).expect("Failed to create database");

    db.initialize()
        .expect("Failed to initialize database schema");

    db.seed_demo_data().expect("Failed to seed demo data");
    tracing::info!("Database initialized successfully");

    // Create application state
    let state = AppState::new(db, settings.webhooks.clone());

    // Run initial session cleanup on startup
    match state.session_manager.cleanup_expired_sessions() {
        Ok(count) if count > 0 => {
            tracing::info!("Cleaned up {} expired sessions on startup", count)
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Failed to cleanup expired sessions on startup: {}", e),
    }

    // Start background task for periodic session cleanup
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match cleanup_state.session_manager.cleanup_expired_sessions() {
                Ok(count) if count > 0 => {
                    tracing::info!("Periodic cleanup: removed {} expired sessions", count)
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Periodic session cleanup failed: {}", e),
            }
        }
    });

    // Warm the stats cache and start the auto-refresh schedule
    if let Err(e) = state.scheduler.refresh_now() {
        tracing::error!("Initial stats refresh failed: {}", e);
    }
    state.scheduler.start(refresh::DEFAULT_INTERVAL);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets_dir = PathBuf::from(&settings.assets.dir);
    if !assets_dir.is_dir() {
        tracing::warn!(
            "Asset directory {} not found; static routes will fall through to 404",
            assets_dir.display()
        );
    }

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication routes
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/validate", get(api::auth::validate_session))
        // Tweet query routes
        .route("/api/tweets", get(api::tweets::get_tweets))
        // Aggregation routes
        .route("/api/stats", get(api::stats::get_stats))
        .route("/api/stats/refresh", post(api::stats::refresh_stats))
        .route("/api/stats/schedule", get(api::stats::get_schedule))
        .route("/api/stats/schedule", put(api::stats::update_schedule))
        .route("/api/stats/timeline", get(api::stats::get_timeline))
        .route("/api/stats/distribution", get(api::stats::get_distribution))
        // Webhook relay routes
        .route("/api/search/tweets", get(api::relay::search_tweets))
        .route("/api/search/videos", get(api::relay::search_videos))
        .route("/api/chat", post(api::relay::chat))
        .route("/api/sms", post(api::relay::send_sms))
        // Voter roster routes
        .route("/api/voters", post(api::voters::upload_voters))
        .route("/api/voters/template", get(api::voters::download_template))
        // Everything else is the built frontend
        .fallback(static_files::serve)
        .with_state(state)
        .layer(Extension(static_files::AssetDir(assets_dir)))
        .layer(CompressionLayer::new())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

async fn health_check() -> &'static str {
    "OK"
}
