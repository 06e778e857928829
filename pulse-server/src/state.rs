use std::sync::Arc;

use crate::config::Webhooks;
use crate::db::Database;
use crate::refresh::RefreshScheduler;
use crate::relay::WebhookRelay;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_manager: SessionManager,
    pub relay: WebhookRelay,
    pub scheduler: Arc<RefreshScheduler>,
}

impl AppState {
    pub fn new(db: Database, webhooks: Webhooks) -> Self {
        let session_manager = SessionManager::new(db.clone());
        let relay = WebhookRelay::new(webhooks);
        let scheduler = RefreshScheduler::new(db.clone());
        Self {
            db,
            session_manager,
            relay,
            scheduler,
        }
    }

    /// Get authenticated operator ID from a session token
    pub fn authenticated_operator_from_token(&self, token: &str) -> Option<uuid::Uuid> {
        self.session_manager.validate_session(token).ok()
    }
}
