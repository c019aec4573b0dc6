//! # epi-db
//!
//! libSQL persistence for epicast: the aggregate outbreak table, the
//! per-year series store, and the forecast table.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) for both local files
//! and remote databases. [`EpiDb`] implements
//! [`epi_core::store::OutbreakStore`], which is all the pipeline sees.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
mod store;

use std::path::Path;

use epi_config::DatabaseConfig;
use error::DatabaseError;
use libsql::Builder;
use retry::RetryConfig;

/// In-memory database path accepted by [`EpiDb::open_local`].
pub const MEMORY: &str = ":memory:";

/// Database handle for all epicast state.
pub struct EpiDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl EpiDb {
    /// Open a local database at the given path, creating parent directories.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != MEMORY
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Builder::new_local(path).build().await?;
        Self::init(db).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the server is unreachable or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::init(db).await
    }

    /// Open the configured database, retrying while it is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unavailable` once `connect_attempts` are
    /// exhausted, or the first non-retryable error.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let retry = RetryConfig::from(config);
        retry::with_retry(&retry, || async {
            if config.is_remote() {
                tracing::debug!(url = %config.url, "connecting to remote database");
                Self::open_remote(&config.url, &config.auth_token).await
            } else {
                tracing::debug!(path = %config.path, "opening local database");
                Self::open_local(&config.path).await
            }
        })
        .await
    }

    async fn init(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Remote builders connect lazily; probe so an unreachable server
        // surfaces as a retryable driver error rather than a migration error.
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;

        let epi_db = Self { db, conn };
        epi_db.run_migrations().await?;
        Ok(epi_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Run a `SELECT COUNT(*)` style query and return the count.
    pub(crate) async fn count(&self, sql: &str) -> Result<u64, DatabaseError> {
        let mut rows = self.conn.query(sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        helpers::get_count(&row, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> EpiDb {
        EpiDb::open_local(MEMORY).await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["outbreak_aggregates", "disease_cases_yearly", "disease_forecasts"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Second run is a no-op
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn open_local_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("epicast.db");
        let db = EpiDb::open_local(path.to_str().unwrap()).await.unwrap();
        assert_eq!(db.count_yearly_rows().await.unwrap(), 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn connect_uses_local_path_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epicast.db");
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            connect_attempts: 1,
            connect_delay_ms: 0,
            ..DatabaseConfig::default()
        };
        let db = EpiDb::connect(&config).await.unwrap();
        assert_eq!(db.count_yearly_rows().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epicast.db");
        let path = path.to_str().unwrap();
        {
            let db = EpiDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO disease_cases_yearly (disease, year, cases) VALUES ('Cholera', 2007, 10)",
                    (),
                )
                .await
                .unwrap();
        }
        let db = EpiDb::open_local(path).await.unwrap();
        assert_eq!(db.count_yearly_rows().await.unwrap(), 1);
    }
}
