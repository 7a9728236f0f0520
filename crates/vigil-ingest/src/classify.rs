//! Keyword-based risk classification.
//!
//! A deterministic lookup: lower-cased title and description are checked
//! against two ordered keyword sets, critical before high, first match wins.
//! Severity and priority derive from the risk level.

use vigil_core::{RiskLevel, Severity};

/// Keywords that escalate a record straight to [`RiskLevel::Critical`].
pub const CRITICAL_KEYWORDS: &[&str] = &["breach", "violation", "penalty", "fine", "enforcement"];

/// Keywords that escalate a record to [`RiskLevel::High`] when no critical
/// keyword matched.
pub const HIGH_KEYWORDS: &[&str] = &["warning", "alert", "investigation", "compliance"];

/// Risk triple assigned to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub risk_level: RiskLevel,
    pub severity: Severity,
    pub priority: u8,
}

/// Classify a record from its title and description.
///
/// A keyword match in either field triggers escalation; the critical set is
/// checked before the high set and the first matching set wins. No keyword
/// match means [`RiskLevel::Medium`].
#[must_use]
pub fn classify(title: &str, description: &str) -> Classification {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    let matches_any =
        |keywords: &[&str]| keywords.iter().any(|k| title.contains(k) || description.contains(k));

    let risk_level = if matches_any(CRITICAL_KEYWORDS) {
        RiskLevel::Critical
    } else if matches_any(HIGH_KEYWORDS) {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    Classification {
        risk_level,
        severity: risk_level.severity(),
        priority: risk_level.priority(),
    }
}

/// All risk keywords found in the title or description, critical set first.
/// Used to enrich record tags.
#[must_use]
pub fn matched_keywords(title: &str, description: &str) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    CRITICAL_KEYWORDS
        .iter()
        .chain(HIGH_KEYWORDS)
        .filter(|k| title.contains(*k) || description.contains(*k))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforcement_in_title_is_critical_regardless_of_description() {
        let c = classify("SEC enforcement action announced", "routine text");
        assert_eq!(c.risk_level, RiskLevel::Critical);
        assert_eq!(c.severity, Severity::Critical);
        assert_eq!(c.priority, 1);
    }

    #[test]
    fn description_match_alone_escalates() {
        let c = classify("Quarterly roundup", "a data breach was disclosed");
        assert_eq!(c.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn high_keywords_apply_only_without_critical_match() {
        let c = classify("Consumer warning issued", "details pending");
        assert_eq!(c.risk_level, RiskLevel::High);
        assert_eq!(c.severity, Severity::Warning);
        assert_eq!(c.priority, 2);
    }

    #[test]
    fn critical_wins_when_both_sets_match() {
        let c = classify("Warning: penalty assessed", "");
        assert_eq!(c.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn no_match_defaults_to_medium() {
        let c = classify("Market update", "routine quarterly filing");
        assert_eq!(c.risk_level, RiskLevel::Medium);
        assert_eq!(c.severity, Severity::Info);
        assert_eq!(c.priority, 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = classify("PENALTY Assessed", "");
        assert_eq!(c.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn matched_keywords_lists_critical_first() {
        let found = matched_keywords("Warning after breach", "compliance review");
        assert_eq!(found, vec!["breach", "warning", "compliance"]);
    }
}
