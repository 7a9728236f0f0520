//! Append-only log of completed aggregation cycles.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::StoreError;

/// A row from the `cycle_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CycleRunRow {
    pub id: i64,
    pub public_id: String,
    pub trigger_source: String,
    pub sources_attempted: i64,
    pub sources_succeeded: i64,
    pub sources_failed: i64,
    pub records_new: i64,
    pub forwarded: i64,
    pub forward_ok: bool,
    pub errors: String,
    pub completed_at: DateTime<Utc>,
}

/// Cycle outcome to append to the log.
#[derive(Debug, Clone)]
pub struct NewCycleRun<'a> {
    pub trigger_source: &'a str,
    pub sources_attempted: i64,
    pub sources_succeeded: i64,
    pub sources_failed: i64,
    pub records_new: i64,
    pub forwarded: i64,
    pub forward_ok: bool,
    pub errors: &'a [String],
    pub completed_at: DateTime<Utc>,
}

/// Append one finished cycle to the log. Generates the public id in Rust and
/// returns it.
///
/// # Errors
///
/// Returns [`StoreError`] if the insert fails or errors cannot be serialized.
pub async fn insert_cycle_run(pool: &SqlitePool, run: &NewCycleRun<'_>) -> Result<String, StoreError> {
    let public_id = Uuid::new_v4().to_string();
    let errors = serde_json::to_string(run.errors)?;

    sqlx::query(
        "INSERT INTO cycle_runs \
         (public_id, trigger_source, sources_attempted, sources_succeeded, sources_failed, \
          records_new, forwarded, forward_ok, errors, completed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&public_id)
    .bind(run.trigger_source)
    .bind(run.sources_attempted)
    .bind(run.sources_succeeded)
    .bind(run.sources_failed)
    .bind(run.records_new)
    .bind(run.forwarded)
    .bind(run.forward_ok)
    .bind(errors)
    .bind(run.completed_at)
    .execute(pool)
    .await?;

    Ok(public_id)
}

/// The most recent cycle runs, newest first.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn recent_cycle_runs(pool: &SqlitePool, limit: i64) -> Result<Vec<CycleRunRow>, StoreError> {
    let rows = sqlx::query_as::<_, CycleRunRow>(
        "SELECT id, public_id, trigger_source, sources_attempted, sources_succeeded, \
                sources_failed, records_new, forwarded, forward_ok, errors, completed_at \
         FROM cycle_runs ORDER BY id DESC LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
