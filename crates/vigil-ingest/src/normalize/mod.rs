//! Normalizer variants: raw payload + owning source config in, records out.
//!
//! One variant per [`SourceKind`]. Every variant honors the same contract:
//! an entry missing its title or link/identifier is dropped silently, and the
//! output is always either a complete record or nothing.

mod rss;
mod status;
mod web;

use chrono::{DateTime, Utc};
use vigil_core::{Record, SourceConfig, SourceKind};

use crate::error::IngestError;

/// Extract records from a fetched payload using the normalizer variant the
/// source is configured with.
///
/// # Errors
///
/// Returns [`IngestError::Xml`] or [`IngestError::Json`] when the payload is
/// structurally malformed. Entries that are merely incomplete are skipped,
/// not errors.
pub fn extract_records(
    body: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Record>, IngestError> {
    match source.kind {
        SourceKind::Rss => rss::extract(body, source, fetched_at),
        SourceKind::Web => Ok(web::extract(body, source, fetched_at)),
        SourceKind::Statuspage => status::extract_statuspage(body, source, fetched_at),
        SourceKind::Gcp => status::extract_gcp(body, source, fetched_at),
        SourceKind::Aws => status::extract_aws(body, source, fetched_at),
    }
}

/// Strip HTML tags from a string, returning plain text.
pub(crate) fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_trims() {
        assert_eq!(
            strip_html("  <p>A <b>penalty</b> was assessed.</p> "),
            "A penalty was assessed."
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 3), "hél");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
