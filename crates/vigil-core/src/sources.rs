use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Closed set of normalizer variants. Adding a vendor format means adding a
/// variant here plus its normalizer, not another conditional branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// RSS or Atom feed.
    Rss,
    /// HTML listing page scraped for anchor links.
    Web,
    /// Statuspage.io `status.json` endpoint (Stripe, Plaid, ...).
    Statuspage,
    /// Google Cloud incidents JSON.
    Gcp,
    /// AWS status `data.json`.
    Aws,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceKind::Rss => "rss",
            SourceKind::Web => "web",
            SourceKind::Statuspage => "statuspage",
            SourceKind::Gcp => "gcp",
            SourceKind::Aws => "aws",
        };
        f.write_str(s)
    }
}

/// One polled feed or status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Keyword allow/deny lists plus the trusted-source fallback for records
/// matching neither set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub trusted_sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub filtering: FilterConfig,
}

/// Load and validate the source registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty/duplicate names, empty URLs).
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: SourcesFile = serde_yaml::from_str(&content)?;
    validate_sources(&file)?;
    Ok(file)
}

fn validate_sources(file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if source.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' has an empty url",
                source.name
            )));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
    }

    Ok(())
}
