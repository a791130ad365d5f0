// src/ingest/rss.rs
//! RSS 2.0 parse step: `channel/item{title, link, description, pubDate}` → `RawArticle`.
//! Malformed input is logged and yields no articles.

use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::RawArticle;

pub const DEFAULT_MAX_ITEMS: usize = 20;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Parse up to `max_items` items from `xml`, tagging them with `source_name`.
pub fn parse_feed(xml: &str, source_name: &str, max_items: usize) -> Vec<RawArticle> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = match from_str(&xml_clean) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "ingest", error = %e, source = source_name, "rss parse failed");
            counter!("ingest_parse_errors_total").increment(1);
            return Vec::new();
        }
    };

    let out: Vec<RawArticle> = rss
        .channel
        .item
        .into_iter()
        .take(max_items)
        .map(|it| RawArticle {
            title: it.title.map(|s| s.trim().to_string()).unwrap_or_default(),
            description: it.description.unwrap_or_default(),
            published_at: it
                .pub_date
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            source_name: source_name.to_string(),
            article_url: it.link.map(|s| s.trim().to_string()).unwrap_or_default(),
        })
        .collect();

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    counter!("ingest_items_total").increment(out.len() as u64);
    out
}

/// HTML entities that XML does not define would abort the whole parse.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>World</title>
    <link>https://news.example/world</link>
    <item>
      <title>Shelling hits Kharkiv&nbsp;suburbs</title>
      <link>https://news.example/a</link>
      <description><![CDATA[<p>Residents shelter in metro</p>]]></description>
      <pubDate>Fri, 16 Oct 2026 08:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Markets steady</title>
      <link>https://news.example/b</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_and_tags_source() {
        let items = parse_feed(FEED, "Example", DEFAULT_MAX_ITEMS);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Shelling hits Kharkiv suburbs");
        assert_eq!(items[0].description, "<p>Residents shelter in metro</p>");
        assert_eq!(
            items[0].published_at.as_deref(),
            Some("Fri, 16 Oct 2026 08:30:00 +0000")
        );
        assert_eq!(items[0].source_name, "Example");
        assert_eq!(items[1].description, "");
        assert_eq!(items[1].published_at, None);
    }

    #[test]
    fn caps_item_count() {
        let items = parse_feed(FEED, "Example", 1);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn malformed_xml_is_empty_not_a_panic() {
        assert!(parse_feed("<rss><channel><item>", "Broken", 20).is_empty());
        assert!(parse_feed("not xml at all", "Broken", 20).is_empty());
    }

    #[test]
    fn channel_without_items_is_empty() {
        let xml = r#"<rss version="2.0"><channel><title>Quiet</title></channel></rss>"#;
        assert!(parse_feed(xml, "Quiet", 20).is_empty());
    }
}
