use crate::db::Database;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Database-backed session manager for operator authentication.
///
/// Sessions are UUID v4 tokens with a fixed expiry, created at login and
/// deleted at logout. The manager is constructor-injected through
/// `AppState`; nothing reads session state ambiently.
#[derive(Clone)]
pub struct SessionManager {
    db: Database,
}

const SESSION_DAYS: i64 = 7;

impl SessionManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new session for an operator and return its token.
    pub fn create_session(&self, operator_id: Uuid) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = created_at + Duration::days(SESSION_DAYS);

        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO sessions (token, operator_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                token,
                operator_id.to_string(),
                created_at.to_rfc3339(),
                expires_at.to_rfc3339(),
            ],
        )
        .context("Failed to create session")?;

        tracing::info!("Created session for operator {}", operator_id);
        Ok(token)
    }

    /// Validate a session token and return the associated operator ID.
    /// Expired sessions are deleted on sight.
    pub fn validate_session(&self, token: &str) -> Result<Uuid> {
        let conn = self.db.connection()?;

        let (operator_id_str, expires_at_str): (String, String) = conn
            .query_row(
                "SELECT operator_id, expires_at FROM sessions WHERE token = ?1",
                rusqlite::params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Session not found")?;

        let expires_at = DateTime::parse_from_rfc3339(&expires_at_str)
            .context("Failed to parse expiry time")?
            .with_timezone(&Utc);

        if Utc::now() > expires_at {
            self.delete_session(token)?;
            anyhow::bail!("Session has expired");
        }

        let operator_id = Uuid::parse_str(&operator_id_str)
            .context("Failed to parse operator ID")?;

        Ok(operator_id)
    }

    /// Delete a session (logout).
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.db.connection()?;
        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE token = ?1",
                rusqlite::params![token],
            )
            .context("Failed to delete session")?;

        if rows_affected > 0 {
            tracing::info!("Deleted session");
        }

        Ok(())
    }

    /// Remove all sessions past their expiry time. Called periodically to
    /// prevent table bloat.
    pub fn cleanup_expired_sessions(&self) -> Result<usize> {
        let conn = self.db.connection()?;
        let now = Utc::now().to_rfc3339();

        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE expires_at < ?1",
                rusqlite::params![now],
            )
            .context("Failed to cleanup expired sessions")?;

        if rows_affected > 0 {
            tracing::info!("Cleaned up {} expired sessions", rows_affected);
        }

        Ok(rows_affected)
    }
}
