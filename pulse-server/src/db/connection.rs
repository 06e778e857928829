use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use super::schema::{DEMO_DATA, SCHEMA};

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = Self::create_connection_manager(path)?;
        let pool = Pool::new(manager).context("Failed to create database connection pool")?;
        Ok(Self { pool })
    }

    /// Create appropriate connection manager based on path
    fn create_connection_manager<P: AsRef<Path>>(path: P) -> Result<SqliteConnectionManager> {
        let path_str = path.as_ref().to_string_lossy();
        let trimmed_path = path_str.trim();

        if trimmed_path.eq_ignore_ascii_case(MEMORY_DB_PATH) {
            Ok(SqliteConnectionManager::memory())
        } else {
            Ok(SqliteConnectionManager::file(path))
        }
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Initialize the database schema
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Seed the database with demo rows for local development
    pub fn seed_demo_data(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(DEMO_DATA)
            .context("Failed to seed demo data")?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .context("Failed to get database connection from pool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_creation() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");

        let conn = db.connection().expect("Failed to get connection");
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .expect("Failed to prepare statement");

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("Failed to query tables")
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to collect tables");

        assert!(tables.contains(&"operators".to_string()));
        assert!(tables.contains(&"tweets".to_string()));
        assert!(tables.contains(&"voters".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
    }

    #[test]
    fn test_seed_demo_data() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db.seed_demo_data().expect("Failed to seed demo data");

        let conn = db.connection().expect("Failed to get connection");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))
            .expect("Failed to count tweets");
        assert_eq!(count, 5);

        // Seeding twice must not duplicate rows
        db.seed_demo_data().expect("Failed to re-seed demo data");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))
            .expect("Failed to count tweets");
        assert_eq!(count, 5);
    }

    #[test]
    fn test_sentiment_check_constraint() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");

        let conn = db.connection().expect("Failed to get connection");
        let result = conn.execute(
            "INSERT INTO tweets (id, tweet_id, text, username, created_at, sentiment)
             VALUES ('x', '9999', 'bad label', 'u', '2024-01-01T00:00:00+00:00', 'Mixed')",
            [],
        );
        assert!(result.is_err(), "unknown sentiment label should be rejected");
    }
}
