use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use pulse_types::Operator;

use crate::db::DbPool;

pub struct OperatorRepository {
    pool: DbPool,
}

impl OperatorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<Operator>> {
        let conn = self.pool.get()?;
        let operator = conn
            .query_row(
                "SELECT id, email, created_at FROM operators WHERE LOWER(email) = LOWER(?)",
                [email],
                map_operator_row,
            )
            .optional()
            .context("Failed to look up operator")?;
        Ok(operator)
    }

    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<Operator>> {
        let conn = self.pool.get()?;
        let operator = conn
            .query_row(
                "SELECT id, email, created_at FROM operators WHERE id = ?",
                [id.to_string()],
                map_operator_row,
            )
            .optional()
            .context("Failed to look up operator")?;
        Ok(operator)
    }
}

fn map_operator_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Operator> {
    Ok(Operator {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
        email: row.get(1)?,
        created_at: row.get::<_, String>(2)?.parse::<DateTime<Utc>>().unwrap(),
    })
}
