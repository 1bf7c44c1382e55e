//! `SQLite` backend: one `kv_store` table holding every named slot.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{KeyValueStore, Storage};

mod kv_repo;
mod migrate;

/// A single writer is enough for one quiz per process.
const MAX_CONNECTIONS: u32 = 2;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error("invalid sqlite url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open the database at `database_url`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError::InvalidUrl` for an unparseable URL and
    /// `SqliteInitError::Sqlx` if the pool cannot connect.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|source| SqliteInitError::InvalidUrl {
                url: database_url.to_owned(),
                source,
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration query fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Open and migrate a `SQLite` database as the backing store.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or
    /// migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        info!("history store ready at {database_url}");
        Ok(Self {
            kv: Arc::new(repo) as Arc<dyn KeyValueStore>,
        })
    }
}
