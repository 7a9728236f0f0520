//! HTML listing-page normalizer.
//!
//! Extracts anchor links and their visible text from a fetched page.
//! Relative links are resolved against the source URL; anchors, mailto and
//! javascript pseudo-links are skipped, and repeated targets keep only the
//! first occurrence.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use regex::Regex;
use vigil_core::{Record, SourceConfig};

use super::strip_html;

pub(super) fn extract(
    html: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Vec<Record> {
    let re = Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("valid anchor regex");

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for cap in re.captures_iter(html) {
        let href = cap.get(1).map_or("", |m| m.as_str()).trim();
        let title = strip_html(cap.get(2).map_or("", |m| m.as_str()));

        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("javascript:")
            || title.is_empty()
        {
            continue;
        }

        let Some(url) = resolve(href, &source.url) else {
            continue;
        };

        if !seen.insert(url.clone()) {
            continue;
        }

        records.push(Record::new(
            url,
            title,
            String::new(),
            &source.name,
            &source.category,
            None,
            fetched_at,
            source.tags.clone(),
        ));
    }

    records
}

/// Resolve a possibly-relative href against the listing page URL.
fn resolve(href: &str, base: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base = reqwest::Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::SourceKind;

    fn web_source() -> SourceConfig {
        SourceConfig {
            name: "FCA News".to_string(),
            url: "https://www.fca.org.uk/news".to_string(),
            kind: SourceKind::Web,
            category: "Regulatory".to_string(),
            tags: vec!["FCA".to_string()],
            enabled: true,
        }
    }

    const LISTING: &str = r##"<html><body>
<a href="/news/fine-issued">Firm <b>fined</b> for misconduct</a>
<a href="https://example.com/external">External coverage</a>
<a href="#top">Back to top</a>
<a href="mailto:press@fca.org.uk">Contact press office</a>
<a href="/news/fine-issued">Duplicate link to the same story</a>
<a href="/news/empty-title"><img src="x.png"/></a>
</body></html>"##;

    #[test]
    fn extracts_resolves_and_dedups_anchors() {
        let records = extract(LISTING, &web_source(), Utc::now());
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "https://www.fca.org.uk/news/fine-issued",
                "https://example.com/external"
            ]
        );
        assert_eq!(records[0].title, "Firm fined for misconduct");
        assert!(records[0].description.is_empty());
    }

    #[test]
    fn page_without_anchors_yields_nothing() {
        let records = extract("<html><body><p>Nothing here.</p></body></html>", &web_source(), Utc::now());
        assert!(records.is_empty());
    }
}
