use std::time::Duration;

use reqwest::Client;

use crate::error::IngestError;

/// HTTP client for polling source feeds and status endpoints.
///
/// One GET per source per cycle with a configured timeout; there is no retry
/// within a cycle — a failed fetch is that source's failure and the runner
/// moves on.
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Creates a `FetchClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a source URL and return the response body as text.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Http`] — network failure or timeout.
    /// - [`IngestError::UnexpectedStatus`] — any non-2xx response.
    pub async fn fetch_text(&self, url: &str) -> Result<String, IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}
