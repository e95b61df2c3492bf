mod groups;
mod messages;
mod users;

use sqlx::SqlitePool;

use super::StoreError;
use crate::models::parse_timestamp;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn decode_timestamp(
    raw: &str,
    column: &str,
) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
    parse_timestamp(raw)
        .map_err(|e| StoreError::Corrupt(format!("{} '{}': {}", column, raw, e)))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
