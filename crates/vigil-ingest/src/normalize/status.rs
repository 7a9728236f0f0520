//! Vendor status-endpoint normalizers.
//!
//! Three JSON shapes: Statuspage.io `status.json`, GCP `incidents.json`, and
//! AWS `data.json`. An operational vendor yields no records; only observed
//! disruptions become records, keyed by a stable incident identity so the
//! same incident is not re-inserted on every poll.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use vigil_core::{Record, SourceConfig};

use crate::error::IngestError;

// ---------------------------------------------------------------------------
// Statuspage.io (Stripe, Plaid, ...)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StatuspagePayload {
    #[serde(default)]
    status: StatuspageStatus,
}

#[derive(Debug, Default, Deserialize)]
struct StatuspageStatus {
    #[serde(default)]
    indicator: String,
    #[serde(default)]
    description: String,
}

/// Normalize a Statuspage.io overall-status payload.
///
/// An indicator of `none` (or an empty one) means operational: no records.
/// Anything else yields one incident record keyed by source and day, so a
/// disruption that spans several polls inserts once.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if the payload is not valid JSON.
pub(super) fn extract_statuspage(
    body: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Record>, IngestError> {
    let payload: StatuspagePayload = serde_json::from_str(body)?;
    let status = payload.status;

    if status.indicator.is_empty() || status.indicator == "none" {
        return Ok(Vec::new());
    }

    let headline = if status.description.is_empty() {
        "Service issue".to_string()
    } else {
        status.description
    };

    let record = Record::new(
        format!("{}-{}", slug(&source.name), fetched_at.format("%Y%m%d")),
        format!("{}: {headline}", source.name),
        format!("Overall status indicator: {}", status.indicator),
        &source.name,
        &source.category,
        None,
        fetched_at,
        source.tags.clone(),
    );

    Ok(vec![record])
}

// ---------------------------------------------------------------------------
// GCP incidents.json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GcpIncident {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    created_at: String,
}

/// Normalize a GCP incidents list. Only `open`/`investigating` incidents
/// become records; an incident without an id is dropped.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if the payload is not valid JSON.
pub(super) fn extract_gcp(
    body: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Record>, IngestError> {
    let incidents: Vec<GcpIncident> = serde_json::from_str(body)?;

    let records = incidents
        .into_iter()
        .filter(|incident| matches!(incident.status.as_str(), "open" | "investigating"))
        .filter_map(|incident| {
            if incident.id.is_empty() {
                return None;
            }

            let title = if incident.summary.is_empty() {
                format!("{} incident", source.name)
            } else {
                incident.summary
            };

            let published_at = DateTime::parse_from_rfc3339(incident.created_at.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc));

            Some(Record::new(
                incident.id,
                title,
                incident.description,
                &source.name,
                &source.category,
                published_at,
                fetched_at,
                source.tags.clone(),
            ))
        })
        .collect();

    Ok(records)
}

// ---------------------------------------------------------------------------
// AWS data.json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AwsPayload {
    #[serde(default)]
    current: Vec<AwsEvent>,
}

#[derive(Debug, Deserialize)]
struct AwsEvent {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    region: String,
    #[serde(default)]
    message: String,
}

/// Normalize the AWS status payload. Entries with status `0` are
/// operational and yield nothing; the rest are keyed `aws-<region>`.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if the payload is not valid JSON.
pub(super) fn extract_aws(
    body: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Record>, IngestError> {
    let payload: AwsPayload = serde_json::from_str(body)?;

    let records = payload
        .current
        .into_iter()
        .filter(|event| event.status != 0)
        .map(|event| {
            let region = if event.region.is_empty() {
                "unknown".to_string()
            } else {
                event.region
            };
            let description = if event.message.is_empty() {
                "Service disruption detected".to_string()
            } else {
                event.message
            };

            Record::new(
                format!("aws-{region}"),
                format!("AWS {region} issue"),
                description,
                &source.name,
                &source.category,
                None,
                fetched_at,
                source.tags.clone(),
            )
        })
        .collect();

    Ok(records)
}

/// Lowercase a source name into a URL-safe identity fragment.
fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
