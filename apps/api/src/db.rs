use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A uniqueness constraint rejected the write.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maps a unique-constraint violation onto `AlreadyExists`, passing other errors through.
pub(crate) fn classify_write_error(entity: &'static str, key: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::AlreadyExists {
            entity,
            key: key.to_string(),
        },
        _ => StoreError::Sqlx(err),
    }
}

/// Handle to the analytics database.
///
/// Constructed once in `main`, shared through `AppState`, and closed after the
/// server drains. Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    /// Opens (creating if needed) the SQLite database at `url`, e.g. `sqlite:analytics.db`.
    pub async fn open(url: &str) -> StoreResult<Self> {
        Self::open_with_pool_size(url, DEFAULT_POOL_SIZE).await
    }

    pub async fn open_with_pool_size(url: &str, pool_size: u32) -> StoreResult<Self> {
        info!("Opening analytics store at {url}...");

        // Event rows keep their session reference even when no session row exists.
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await?;

        info!("Analytics store ready (pool size: {pool_size})");
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        info!("Running analytics migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Analytics store closed");
    }
}
