use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use pulse_types::VoterRecord;

use crate::db::DbPool;

pub struct VoterRepository {
    pool: DbPool,
}

impl VoterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a batch of validated voter rows in one transaction.
    pub fn insert_batch(&self, voters: &[VoterRecord]) -> Result<usize> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to open transaction")?;
        let imported_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO voters (id, phone_number, first_name, last_name, opted_in, imported_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for voter in voters {
                stmt.execute(rusqlite::params![
                    Uuid::new_v4().to_string(),
                    voter.phone_number,
                    voter.first_name,
                    voter.last_name,
                    voter.opted_in,
                    imported_at,
                ])
                .context("Failed to insert voter")?;
            }
        }

        tx.commit().context("Failed to commit voter batch")?;
        Ok(voters.len())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row("SELECT COUNT(*) FROM voters", [], |row| row.get(0))?;
        Ok(count)
    }
}
