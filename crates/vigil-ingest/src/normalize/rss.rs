//! RSS/Atom feed normalizer.
//!
//! Streaming quick-xml parse that handles both RSS `<item>` and Atom
//! `<entry>` elements. Title and link are required; description is taken
//! from the richest available field (`content:encoded` > `summary` >
//! `description`) and HTML-stripped.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use vigil_core::{Record, SourceConfig};

use super::strip_html;
use crate::error::IngestError;

#[derive(Default)]
struct RawEntry {
    title: String,
    link: String,
    description: String,
    summary: String,
    content: String,
    pub_date: String,
    published: String,
    updated: String,
}

impl RawEntry {
    fn assign(&mut self, tag: &str, text: String) {
        match tag {
            "title" => self.title = text,
            "link" => self.link = text,
            "description" => self.description = text,
            "summary" => self.summary = text,
            "content:encoded" | "content" => self.content = text,
            "pubDate" => self.pub_date = text,
            "published" => self.published = text,
            "updated" => self.updated = text,
            _ => {}
        }
    }
}

/// Parse a feed body into records.
///
/// # Errors
///
/// Returns [`IngestError::Xml`] if the XML is structurally malformed.
pub(super) fn extract(
    xml: &str,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Record>, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut entry = RawEntry::default();
    let mut in_entry = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                match name.as_str() {
                    "item" | "entry" => {
                        in_entry = true;
                        entry = RawEntry::default();
                    }
                    _ => current_tag = name,
                }
            }
            Ok(Event::Empty(e)) => {
                // Atom carries the link as <link href="..."/>.
                if in_entry && e.name().as_ref() == b"link" && entry.link.is_empty() {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"href" {
                            if let Ok(href) = attr.unescape_value() {
                                entry.link = href.trim().to_string();
                            }
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if matches!(name, "item" | "entry") && in_entry {
                    in_entry = false;
                    if let Some(record) = normalize_entry(&entry, source, fetched_at) {
                        records.push(record);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    entry.assign(&current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    entry.assign(&current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(IngestError::Xml(e)),
            _ => {}
        }
    }

    Ok(records)
}

/// Convert one parsed entry into a record, or nothing when title or link is
/// missing. Never produces a partial record.
fn normalize_entry(
    entry: &RawEntry,
    source: &SourceConfig,
    fetched_at: DateTime<Utc>,
) -> Option<Record> {
    let title = strip_html(&entry.title);
    let link = entry.link.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    // Richest available content wins.
    let raw_description = if !entry.content.is_empty() {
        &entry.content
    } else if !entry.summary.is_empty() {
        &entry.summary
    } else {
        &entry.description
    };
    let description = strip_html(raw_description);

    let published_at = parse_entry_date(entry);

    Some(Record::new(
        link.to_string(),
        title,
        description,
        &source.name,
        &source.category,
        published_at,
        fetched_at,
        source.tags.clone(),
    ))
}

fn parse_entry_date(entry: &RawEntry) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(entry.pub_date.trim()) {
        return Some(dt.with_timezone(&Utc));
    }
    for raw in [&entry.published, &entry.updated] {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::SourceKind;

    fn rss_source() -> SourceConfig {
        SourceConfig {
            name: "SEC News".to_string(),
            url: "https://www.sec.gov/news/pressreleases.rss".to_string(),
            kind: SourceKind::Rss,
            category: "Regulatory".to_string(),
            tags: vec!["SEC".to_string()],
            enabled: true,
        }
    }

    const FEED_WITH_MISSING_LINK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>SEC News</title>
    <item>
      <title>SEC enforcement action announced</title>
      <link>https://example.com/enforcement</link>
      <description><![CDATA[<p>A <b>penalty</b> was assessed.</p>]]></description>
      <pubDate>Mon, 05 Aug 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Entry without a link is dropped</title>
      <description>No link here.</description>
    </item>
    <item>
      <title>Routine market update</title>
      <link>https://example.com/update</link>
      <description>Quarterly summary.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn entries_missing_a_link_are_dropped_silently() {
        let records = extract(FEED_WITH_MISSING_LINK, &rss_source(), Utc::now())
            .expect("feed should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "https://example.com/enforcement");
        assert_eq!(records[1].id, "https://example.com/update");
    }

    #[test]
    fn description_is_html_stripped_and_date_parsed() {
        let fetched_at = Utc::now();
        let records =
            extract(FEED_WITH_MISSING_LINK, &rss_source(), fetched_at).expect("feed should parse");

        let first = &records[0];
        assert_eq!(first.description, "A penalty was assessed.");
        assert_eq!(first.published_at.to_rfc3339(), "2024-08-05T10:00:00+00:00");
        assert_eq!(first.source, "SEC News");
        assert_eq!(first.tags, vec!["SEC".to_string()]);

        // No date on the third item: falls back to fetch time.
        assert_eq!(records[1].published_at, fetched_at);
    }

    #[test]
    fn content_encoded_beats_summary_and_description() {
        let xml = r#"<rss version="2.0"><channel>
  <item>
    <title>Richest field wins</title>
    <link>https://example.com/rich</link>
    <description>short</description>
    <summary>medium</summary>
    <content:encoded><![CDATA[full <em>content</em> body]]></content:encoded>
  </item>
</channel></rss>"#;
        let records = extract(xml, &rss_source(), Utc::now()).expect("feed should parse");
        assert_eq!(records[0].description, "full content body");
    }

    #[test]
    fn atom_entries_with_href_links_parse() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>CISA Alerts</title>
  <entry>
    <title>Critical vulnerability alert</title>
    <link href="https://example.com/alert"/>
    <summary>Patch now.</summary>
    <published>2024-08-05T12:30:00Z</published>
  </entry>
</feed>"#;
        let records = extract(xml, &rss_source(), Utc::now()).expect("feed should parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "https://example.com/alert");
        assert_eq!(records[0].description, "Patch now.");
        assert_eq!(
            records[0].published_at.to_rfc3339(),
            "2024-08-05T12:30:00+00:00"
        );
    }

    #[test]
    fn empty_feed_returns_no_records() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        let records = extract(xml, &rss_source(), Utc::now()).expect("feed should parse");
        assert!(records.is_empty());
    }
}
