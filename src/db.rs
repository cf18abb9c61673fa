// Database related types and functions

use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

pub mod calculations;
pub mod notes;
pub mod types;

pub use calculations::{CalculationSummary, SavedCalculation};
pub use notes::Note;
pub use types::{CalculationId, UserKey};

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Create the history and notes tables when they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        tracing::debug!("Ensuring database schema");
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS calculations(
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        INTEGER NOT NULL,
                shape          TEXT    NOT NULL,
                unit           TEXT    NOT NULL,
                length         REAL,
                width          REAL,
                diameter       REAL,
                height         REAL,
                floor_area     REAL    NOT NULL,
                perimeter      REAL    NOT NULL,
                wall_area      REAL,
                volume         REAL,
                deducted_area  REAL    NOT NULL DEFAULT 0,
                net_wall_area  REAL,
                created_at     INTEGER NOT NULL
            )",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS deductions(
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                calculation_id  INTEGER NOT NULL REFERENCES calculations(id) ON DELETE CASCADE,
                kind            TEXT    NOT NULL,
                length          REAL    NOT NULL,
                width           REAL    NOT NULL,
                area            REAL    NOT NULL
            )",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes(
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL,
                text        TEXT    NOT NULL,
                created_at  INTEGER NOT NULL
            )",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

impl std::ops::Deref for Database {
    type Target = Pool<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

pub fn prepare_sqlite_url(url: &str) -> String {
    if url.starts_with("sqlite:") && !url.contains("mode=") && !url.contains(":memory:") {
        if url.contains('?') {
            format!("{url}&mode=rwc")
        } else {
            format!("{url}?mode=rwc")
        }
    } else {
        url.to_string()
    }
}

pub async fn connect_db(db_url: &str, max_connections: u32) -> Result<Pool<Sqlite>> {
    tracing::debug!(db_url = %db_url, "Connecting to database");
    let options = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?)
}

/// Open an in-memory database with the schema in place.
pub async fn open_in_memory() -> Result<Database> {
    let db = Database::new(connect_db("sqlite::memory:", 1).await?);
    db.init_schema().await?;
    Ok(db)
}

pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_sqlite_url_basic() {
        assert_eq!(
            prepare_sqlite_url("sqlite:items.db"),
            "sqlite:items.db?mode=rwc"
        );
    }

    #[test]
    fn prepare_sqlite_url_with_query() {
        assert_eq!(
            prepare_sqlite_url("sqlite:items.db?cache=shared"),
            "sqlite:items.db?cache=shared&mode=rwc"
        );
    }

    #[test]
    fn prepare_sqlite_url_existing_mode() {
        assert_eq!(
            prepare_sqlite_url("sqlite:items.db?mode=ro"),
            "sqlite:items.db?mode=ro"
        );
    }

    #[test]
    fn prepare_sqlite_url_memory() {
        assert_eq!(prepare_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn schema_is_idempotent() -> Result<()> {
        let db = open_in_memory().await?;
        db.init_schema().await?;
        Ok(())
    }
}
