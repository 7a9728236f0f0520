//! HTTP client for the intake API that consumes aggregated records.
//!
//! Wraps `reqwest` with the one call the pipeline needs: a single batched
//! POST of unsent records. Any non-200 response is a total-batch failure;
//! the caller leaves the records unsent and retries them next cycle.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use vigil_core::Record;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("intake API returned status {status}")]
    UnexpectedStatus { status: u16 },
}

/// One record in the shape the intake API expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    pub title: String,
    pub description: String,
    pub source: String,
    pub category: String,
    pub risk_level: String,
    pub severity: String,
    pub status: String,
    pub priority: u8,
    pub published_at: String,
    pub tags: Vec<String>,
}

impl ArticlePayload {
    /// Project a stored record into the intake payload. `status` is always
    /// `"Active"`: the intake side owns lifecycle transitions.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            source: record.source.clone(),
            category: record.category.clone(),
            risk_level: record.risk_level.as_str().to_owned(),
            severity: record.severity.as_str().to_owned(),
            status: "Active".to_owned(),
            priority: record.priority,
            published_at: record.published_at.to_rfc3339(),
            tags: record.tags.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchBody {
    articles: Vec<ArticlePayload>,
}

/// Client for the configured forwarding endpoint.
pub struct ForwardClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl ForwardClient {
    /// Creates a client with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ForwardError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            token: token.map(str::to_owned),
        })
    }

    /// POST all records as one `{"articles": [...]}` batch.
    ///
    /// An empty batch returns `Ok` without touching the network. One attempt
    /// only; there is no intra-cycle retry.
    ///
    /// # Errors
    ///
    /// - [`ForwardError::Http`] — network failure or timeout.
    /// - [`ForwardError::UnexpectedStatus`] — any response other than 200.
    pub async fn send_batch(&self, records: &[Record]) -> Result<(), ForwardError> {
        if records.is_empty() {
            return Ok(());
        }

        let body = BatchBody {
            articles: records.iter().map(ArticlePayload::from_record).collect(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            return Err(ForwardError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        tracing::debug!(count = records.len(), "forwarded batch to intake API");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::RiskLevel;

    #[test]
    fn payload_uses_camel_case_keys_and_active_status() {
        let mut record = Record::new(
            "https://example.com/a".to_string(),
            "Penalty announced".to_string(),
            "Enforcement action.".to_string(),
            "SEC News",
            "Regulatory",
            None,
            chrono::Utc::now(),
            vec!["SEC".to_string()],
        );
        record.risk_level = RiskLevel::Critical;
        record.severity = record.risk_level.severity();
        record.priority = record.risk_level.priority();

        let payload = ArticlePayload::from_record(&record);
        let json = serde_json::to_value(&payload).expect("payload serializes");

        assert_eq!(json["riskLevel"], "Critical");
        assert_eq!(json["severity"], "Critical");
        assert_eq!(json["status"], "Active");
        assert_eq!(json["priority"], 1);
        assert!(json["publishedAt"].as_str().is_some());
        assert!(json.get("risk_level").is_none(), "keys must be camelCase");
    }
}
