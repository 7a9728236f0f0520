//! Shared domain types and configuration for the vigil aggregation pipeline.
//!
//! Holds the [`Record`] type produced by every normalizer, the risk/severity
//! enums assigned by classification, the env-derived [`AppConfig`], and the
//! YAML source registry.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod record;
pub mod sources;

pub use app_config::{AppConfig, Frequency, ScheduleConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{Record, RiskLevel, Severity};
pub use sources::{load_sources, FilterConfig, SourceConfig, SourceKind, SourcesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
