//! Keyword allow/deny relevance filter.

use vigil_core::FilterConfig;

/// Decide whether a normalized record is worth keeping.
///
/// Exclude keywords are checked first and always win. A record matching any
/// include keyword is kept. A record matching neither set is kept only when
/// its source is on the trusted-source list.
#[must_use]
pub fn is_relevant(title: &str, description: &str, source: &str, filters: &FilterConfig) -> bool {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    let matches_any = |keywords: &[String]| {
        keywords.iter().any(|k| {
            let k = k.to_lowercase();
            title.contains(&k) || description.contains(&k)
        })
    };

    if matches_any(&filters.exclude) {
        return false;
    }

    if matches_any(&filters.include) {
        return true;
    }

    filters
        .trusted_sources
        .iter()
        .any(|t| t.eq_ignore_ascii_case(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> FilterConfig {
        FilterConfig {
            exclude: vec!["sponsored".to_string()],
            include: vec!["compliance".to_string(), "enforcement".to_string()],
            trusted_sources: vec!["SEC News".to_string()],
        }
    }

    #[test]
    fn exclude_keyword_drops_even_trusted_sources() {
        assert!(!is_relevant(
            "Sponsored: compliance webinar",
            "",
            "SEC News",
            &filters()
        ));
    }

    #[test]
    fn include_keyword_keeps_untrusted_sources() {
        assert!(is_relevant(
            "New enforcement sweep",
            "",
            "Some Blog",
            &filters()
        ));
    }

    #[test]
    fn no_match_from_untrusted_source_is_dropped() {
        assert!(!is_relevant(
            "Market update",
            "routine quarterly filing",
            "Some Blog",
            &filters()
        ));
    }

    #[test]
    fn no_match_from_trusted_source_is_kept() {
        assert!(is_relevant(
            "Market update",
            "routine quarterly filing",
            "sec news",
            &filters()
        ));
    }

    #[test]
    fn description_match_counts() {
        assert!(is_relevant(
            "Weekly digest",
            "includes a compliance deadline",
            "Some Blog",
            &filters()
        ));
    }

    #[test]
    fn empty_filter_config_falls_through_to_trust_check() {
        let empty = FilterConfig::default();
        assert!(!is_relevant("Anything", "at all", "Some Blog", &empty));
    }
}
