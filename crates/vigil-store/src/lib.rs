//! Local SQLite store for discovered records and the cycle-run log.
//!
//! One table keyed by record identity with an idempotent insert, plus an
//! append-only `cycle_runs` log. All operations return `Result` so the cycle
//! runner decides whether a storage failure counts against a source.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

pub mod cycle_runs;
pub mod records;

pub use cycle_runs::{insert_cycle_run, recent_cycle_runs, CycleRunRow, NewCycleRun};
pub use records::{
    counts, delete_older_than, mark_sent, recent_since, unsent, upsert_ignore, RecordRow,
    StoreCounts,
};

const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/vigil-store/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("tag serialization: {0}")]
    Tags(#[from] serde_json::Error),

    #[error("corrupt row '{id}': {reason}")]
    Decode { id: String, reason: String },
}

/// Open (creating if necessary) the SQLite database at `path` and connect
/// a pool to it. The parent directory is created when missing.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the pool cannot be established.
pub async fn connect_pool(path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Sqlx(sqlx::Error::Io(e)))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Run embedded migrations against the given pool.
///
/// # Errors
///
/// Returns [`StoreError::Migration`] if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
