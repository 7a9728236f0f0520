//! One full aggregation cycle: poll every enabled source in registry order,
//! then forward the unsent backlog in a single batch.

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use vigil_core::{AppConfig, FilterConfig, SourceConfig};
use vigil_forward::ForwardClient;
use vigil_store::NewCycleRun;

use crate::classify::{classify, matched_keywords};
use crate::client::FetchClient;
use crate::normalize::{extract_records, truncate_chars};
use crate::relevance::is_relevant;

/// Outcome of one cycle. Constructed fresh per cycle and appended to the
/// `cycle_runs` log; never an error — failures are counted, not raised.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub sources_attempted: usize,
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    pub records_new: usize,
    pub forwarded: usize,
    pub forward_ok: bool,
    pub errors: Vec<String>,
}

impl Default for CycleReport {
    fn default() -> Self {
        Self {
            sources_attempted: 0,
            sources_succeeded: 0,
            sources_failed: 0,
            records_new: 0,
            forwarded: 0,
            // A cycle with nothing to forward counts as a successful forward step.
            forward_ok: true,
            errors: Vec::new(),
        }
    }
}

/// Drives fetch → normalize → classify → store for every enabled source,
/// then the batched forward of unsent records.
pub struct CycleRunner {
    config: AppConfig,
    sources: Vec<SourceConfig>,
    filters: FilterConfig,
    pool: SqlitePool,
    http: FetchClient,
    forward: ForwardClient,
}

impl CycleRunner {
    #[must_use]
    pub fn new(
        config: AppConfig,
        sources: Vec<SourceConfig>,
        filters: FilterConfig,
        pool: SqlitePool,
        http: FetchClient,
        forward: ForwardClient,
    ) -> Self {
        Self {
            config,
            sources,
            filters,
            pool,
            http,
            forward,
        }
    }

    /// Run one complete cycle. `trigger` labels the cycle-log row
    /// (`"cli"` or `"scheduler"`).
    ///
    /// Never fails: fetch, parse, and storage errors are downgraded to
    /// warnings and counters at their scope, and a forwarding failure simply
    /// leaves records unsent for the next cycle.
    pub async fn run(&self, trigger: &str) -> CycleReport {
        let mut report = CycleReport::default();

        let enabled: Vec<&SourceConfig> =
            self.sources.iter().filter(|s| s.enabled).collect();
        report.sources_attempted = enabled.len();

        for (idx, source) in enabled.iter().enumerate() {
            match self.process_source(source).await {
                Ok(new_records) => {
                    report.sources_succeeded += 1;
                    report.records_new += new_records;
                    tracing::info!(
                        source = %source.name,
                        new_records,
                        "source processed"
                    );
                }
                Err(message) => {
                    report.sources_failed += 1;
                    tracing::warn!(source = %source.name, error = %message, "source failed");
                    report.errors.push(format!("{}: {message}", source.name));
                }
            }

            // Politeness delay between sources, skipped after the last one.
            if idx + 1 < enabled.len() && self.config.inter_source_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.inter_source_delay_ms)).await;
            }
        }

        self.forward_unsent(&mut report).await;

        tracing::info!(
            attempted = report.sources_attempted,
            succeeded = report.sources_succeeded,
            failed = report.sources_failed,
            new_records = report.records_new,
            forwarded = report.forwarded,
            forward_ok = report.forward_ok,
            "cycle complete"
        );

        self.log_cycle(trigger, &report).await;

        report
    }

    /// Fetch, normalize, filter, classify, and store one source's entries.
    /// Returns the number of newly created records, or a message describing
    /// why the source failed.
    async fn process_source(&self, source: &SourceConfig) -> Result<usize, String> {
        let fetched_at = Utc::now();

        let body = self
            .http
            .fetch_text(&source.url)
            .await
            .map_err(|e| format!("fetch: {e}"))?;

        let candidates = extract_records(&body, source, fetched_at)
            .map_err(|e| format!("parse: {e}"))?;

        let mut new_records = 0usize;

        for mut record in candidates
            .into_iter()
            .take(self.config.max_per_source)
        {
            if !is_relevant(&record.title, &record.description, &record.source, &self.filters) {
                tracing::debug!(source = %source.name, id = %record.id, "dropped by relevance filter");
                continue;
            }

            let classification = classify(&record.title, &record.description);
            record.risk_level = classification.risk_level;
            record.severity = classification.severity;
            record.priority = classification.priority;

            for keyword in matched_keywords(&record.title, &record.description) {
                if !record.tags.iter().any(|t| t.eq_ignore_ascii_case(keyword)) {
                    record.tags.push(keyword.to_string());
                }
            }

            record.description = truncate_chars(&record.description, self.config.content_max_len);

            match vigil_store::upsert_ignore(&self.pool, &record).await {
                Ok(true) => new_records += 1,
                Ok(false) => {
                    tracing::debug!(id = %record.id, "already seen");
                }
                Err(e) => return Err(format!("storage: {e}")),
            }
        }

        Ok(new_records)
    }

    /// Forward the full unsent backlog as one batch. On success the rows are
    /// marked sent; on any failure they are left for the next cycle.
    async fn forward_unsent(&self, report: &mut CycleReport) {
        let rows = match vigil_store::unsent(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => {
                report.forward_ok = false;
                report.errors.push(format!("loading unsent records: {e}"));
                tracing::error!(error = %e, "failed to load unsent records");
                return;
            }
        };

        if rows.is_empty() {
            tracing::info!("no unsent records to forward");
            return;
        }

        let mut ids = Vec::with_capacity(rows.len());
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match row.into_record() {
                Ok(record) => {
                    ids.push(id);
                    records.push(record);
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "skipping undecodable row");
                    report.errors.push(format!("decoding {id}: {e}"));
                }
            }
        }

        match self.forward.send_batch(&records).await {
            Ok(()) => {
                report.forwarded = records.len();
                if let Err(e) = vigil_store::mark_sent(&self.pool, &ids).await {
                    // The batch went out but the flag update failed; the rows
                    // will be re-sent next cycle (at-least-once delivery).
                    tracing::error!(error = %e, "failed to mark records sent");
                    report.errors.push(format!("marking records sent: {e}"));
                }
            }
            Err(e) => {
                report.forward_ok = false;
                tracing::warn!(
                    count = records.len(),
                    error = %e,
                    "forwarding failed; records stay unsent for next cycle"
                );
                report.errors.push(format!("forwarding: {e}"));
            }
        }
    }

    /// Append the finished report to the cycle log. Log-only on failure:
    /// the report is still returned to the caller.
    async fn log_cycle(&self, trigger: &str, report: &CycleReport) {
        let run = NewCycleRun {
            trigger_source: trigger,
            sources_attempted: to_i64(report.sources_attempted),
            sources_succeeded: to_i64(report.sources_succeeded),
            sources_failed: to_i64(report.sources_failed),
            records_new: to_i64(report.records_new),
            forwarded: to_i64(report.forwarded),
            forward_ok: report.forward_ok,
            errors: &report.errors,
            completed_at: Utc::now(),
        };

        if let Err(e) = vigil_store::insert_cycle_run(&self.pool, &run).await {
            tracing::error!(error = %e, "failed to append cycle log");
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
