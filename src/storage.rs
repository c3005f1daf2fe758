//! SQLite storage layer for computed wrapped summaries.
//!
//! One row per (did, year). The serialized record is stored as JSON text
//! alongside a `computed_at` epoch-milliseconds column so the API layer can
//! apply its freshness policy without deserializing, and a handle column so
//! share pages can look records up by handle.

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::model::Wrapped;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Create a new storage instance and initialize the schema.
    ///
    /// # Arguments
    ///
    /// * `database_url` - SQLite connection string (e.g., "sqlite:skywrapped.db" or "sqlite::memory:")
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let storage = Self { pool };
        storage.initialize_schema().await?;

        Ok(storage)
    }

    async fn initialize_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wrapped_summaries (
                did TEXT NOT NULL,
                year INTEGER NOT NULL,
                handle TEXT NOT NULL,
                computed_at INTEGER NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (did, year)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Share pages address records by handle, not did
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_wrapped_summaries_handle_year
            ON wrapped_summaries(handle, year)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace the summary for this user and year.
    ///
    /// Last write wins: the aggregation is deterministic for a given input
    /// set, so concurrent writers for the same user-year converge anyway.
    pub async fn upsert_wrapped(&self, wrapped: &Wrapped) -> anyhow::Result<()> {
        let data = serde_json::to_string(wrapped)?;

        sqlx::query(
            r#"
            INSERT INTO wrapped_summaries (did, year, handle, computed_at, data)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (did, year) DO UPDATE SET
                handle = excluded.handle,
                computed_at = excluded.computed_at,
                data = excluded.data
            "#,
        )
        .bind(&wrapped.did)
        .bind(wrapped.year)
        .bind(&wrapped.handle)
        .bind(wrapped.created_at)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a stored summary by did or handle.
    pub async fn get_wrapped(&self, actor: &str, year: i32) -> anyhow::Result<Option<Wrapped>> {
        let row = sqlx::query(
            r#"
            SELECT data
            FROM wrapped_summaries
            WHERE (did = ? OR handle = ?) AND year = ?
            "#,
        )
        .bind(actor)
        .bind(actor)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }

    /// When the stored summary for this actor and year was computed, as
    /// epoch milliseconds. `None` when no summary exists.
    pub async fn get_computed_at(&self, actor: &str, year: i32) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            SELECT computed_at
            FROM wrapped_summaries
            WHERE (did = ? OR handle = ?) AND year = ?
            "#,
        )
        .bind(actor)
        .bind(actor)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.get("computed_at")))
    }
}
