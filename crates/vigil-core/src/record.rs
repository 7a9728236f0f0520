use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level assigned to a record by keyword classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
}

impl RiskLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
        }
    }

    /// Severity derived from risk: Critical stays Critical, High becomes
    /// Warning, everything else is informational.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            RiskLevel::Critical => Severity::Critical,
            RiskLevel::High => Severity::Warning,
            RiskLevel::Medium => Severity::Info,
        }
    }

    /// Forwarding priority derived from risk: 1 = most urgent.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            RiskLevel::Critical => 1,
            RiskLevel::High => 2,
            RiskLevel::Medium => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(RiskLevel::Critical),
            "High" => Ok(RiskLevel::High),
            "Medium" => Ok(RiskLevel::Medium),
            other => Err(format!("unknown risk level: '{other}'")),
        }
    }
}

/// Alert severity reported to the intake API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Severity::Critical),
            "Warning" => Ok(Severity::Warning),
            "Info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: '{other}'")),
        }
    }
}

/// One discovered item: a news article or a vendor incident.
///
/// `id` is the stable identity — the article URL for feed/web sources, the
/// incident id for status sources. Normalizers emit records with the default
/// `Medium`/`Info`/`3` classification; the classifier overwrites those fields
/// before the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub category: String,
    pub risk_level: RiskLevel,
    pub severity: Severity,
    pub priority: u8,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub sent: bool,
}

impl Record {
    /// Build an unclassified record. Classification fields start at the
    /// `Medium`/`Info`/`3` defaults; `sent` starts false.
    #[must_use]
    pub fn new(
        id: String,
        title: String,
        description: String,
        source: &str,
        category: &str,
        published_at: Option<DateTime<Utc>>,
        scraped_at: DateTime<Utc>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            source: source.to_owned(),
            category: category.to_owned(),
            risk_level: RiskLevel::Medium,
            severity: Severity::Info,
            priority: 3,
            published_at: published_at.unwrap_or(scraped_at),
            scraped_at,
            tags,
            sent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_and_priority_derive_from_risk() {
        assert_eq!(RiskLevel::Critical.severity(), Severity::Critical);
        assert_eq!(RiskLevel::High.severity(), Severity::Warning);
        assert_eq!(RiskLevel::Medium.severity(), Severity::Info);
        assert_eq!(RiskLevel::Critical.priority(), 1);
        assert_eq!(RiskLevel::High.priority(), 2);
        assert_eq!(RiskLevel::Medium.priority(), 3);
    }

    #[test]
    fn risk_level_round_trips_through_str() {
        for risk in [RiskLevel::Critical, RiskLevel::High, RiskLevel::Medium] {
            assert_eq!(risk.as_str().parse::<RiskLevel>(), Ok(risk));
        }
        assert!("Low".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn missing_publish_date_falls_back_to_scrape_time() {
        let now = Utc::now();
        let record = Record::new(
            "https://example.com/a".into(),
            "Title".into(),
            String::new(),
            "SEC News",
            "Regulatory",
            None,
            now,
            vec![],
        );
        assert_eq!(record.published_at, now);
        assert!(!record.sent);
    }
}
