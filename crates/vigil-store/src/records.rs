//! Database operations for the `records` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use vigil_core::Record;

use crate::StoreError;

/// A row from the `records` table.
///
/// Classification columns are stored as their display strings; use
/// [`RecordRow::into_record`] to recover the typed [`Record`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecordRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub category: String,
    pub risk_level: String,
    pub severity: String,
    pub priority: i64,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    pub tags: String,
    pub sent: bool,
}

impl RecordRow {
    /// Convert a stored row back into the domain [`Record`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the classification strings, the
    /// priority, or the tags JSON cannot be interpreted.
    pub fn into_record(self) -> Result<Record, StoreError> {
        let decode = |reason: String| StoreError::Decode {
            id: self.id.clone(),
            reason,
        };

        let risk_level = self.risk_level.parse().map_err(&decode)?;
        let severity = self.severity.parse().map_err(&decode)?;
        let priority =
            u8::try_from(self.priority).map_err(|_| decode(format!("priority {}", self.priority)))?;
        let tags: Vec<String> =
            serde_json::from_str(&self.tags).map_err(|e| decode(format!("tags: {e}")))?;

        Ok(Record {
            id: self.id,
            title: self.title,
            description: self.description,
            source: self.source,
            category: self.category,
            risk_level,
            severity,
            priority,
            published_at: self.published_at,
            scraped_at: self.scraped_at,
            tags,
            sent: self.sent,
        })
    }
}

/// Insert a record if its `id` is not already present.
///
/// Returns `true` when a new row was created. A duplicate insert is a no-op:
/// it neither overwrites existing columns nor resets the `sent` flag.
///
/// # Errors
///
/// Returns [`StoreError`] if the insert fails or tags cannot be serialized.
pub async fn upsert_ignore(pool: &SqlitePool, record: &Record) -> Result<bool, StoreError> {
    let tags = serde_json::to_string(&record.tags)?;

    let result = sqlx::query(
        "INSERT OR IGNORE INTO records \
         (id, title, description, source, category, risk_level, severity, priority, \
          published_at, scraped_at, tags, sent) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)",
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.source)
    .bind(&record.category)
    .bind(record.risk_level.as_str())
    .bind(record.severity.as_str())
    .bind(i64::from(record.priority))
    .bind(record.published_at)
    .bind(record.scraped_at)
    .bind(tags)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All records not yet forwarded, most-recently-scraped first.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn unsent(pool: &SqlitePool) -> Result<Vec<RecordRow>, StoreError> {
    let rows = sqlx::query_as::<_, RecordRow>(
        "SELECT id, title, description, source, category, risk_level, severity, priority, \
                published_at, scraped_at, tags, sent \
         FROM records WHERE sent = 0 \
         ORDER BY scraped_at DESC, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Flip `sent` to true for the given identifiers. Safe to call with an
/// empty slice. Returns the number of rows updated.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the update fails.
pub async fn mark_sent(pool: &SqlitePool, ids: &[String]) -> Result<u64, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("UPDATE records SET sent = 1 WHERE id IN ({placeholders})");

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Records scraped at or after `cutoff`, most recent first.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn recent_since(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<RecordRow>, StoreError> {
    let rows = sqlx::query_as::<_, RecordRow>(
        "SELECT id, title, description, source, category, risk_level, severity, priority, \
                published_at, scraped_at, tags, sent \
         FROM records WHERE scraped_at >= ?1 \
         ORDER BY scraped_at DESC, id",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete records scraped strictly before `cutoff`. Returns the number of
/// rows removed.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the delete fails.
pub async fn delete_older_than(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM records WHERE scraped_at < ?1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Aggregate counts for the status command.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StoreCounts {
    pub total: i64,
    pub unsent: i64,
    pub critical: i64,
    pub high: i64,
}

/// Record totals: overall, unsent backlog, and by escalated risk level.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn counts(pool: &SqlitePool) -> Result<StoreCounts, StoreError> {
    let row = sqlx::query_as::<_, StoreCounts>(
        "SELECT COUNT(*) AS total, \
                COALESCE(SUM(sent = 0), 0) AS unsent, \
                COALESCE(SUM(risk_level = 'Critical'), 0) AS critical, \
                COALESCE(SUM(risk_level = 'High'), 0) AS high \
         FROM records",
    )
    .fetch_one(pool)
    .await?;

    Ok(row)
}
