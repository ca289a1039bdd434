// src/services/rss.rs
use chrono::{DateTime, Utc};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::cache::FileCache;
use super::dates::{days_ago, parse_feed_date};
use crate::config::FeedConfig;
use crate::models::ArticleRecord;

/// Raw feed item as cached on disk, before date filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
}

const FEED_TAGS: [&str; 9] = [
    "title",
    "description",
    "summary",
    "content",
    "link",
    "pubDate",
    "published",
    "updated",
    "dc:date",
];

static TAG_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    FEED_TAGS
        .iter()
        .filter_map(|tag| {
            let pattern = format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>", tag = regex::escape(tag));
            Regex::new(&pattern).ok().map(|re| (*tag, re))
        })
        .collect()
});
static ITEM_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<(item|entry)\b[^>]*>(.*?)</(?:item|entry)>").ok());
static HREF_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"(?is)<link\b[^>]*\bhref\s*=\s*["']([^"']+)["']"#).ok());
static MARKUP_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").ok());

fn tag_content(block: &str, tag: &str) -> Option<String> {
    let re = TAG_PATTERNS.get(tag)?;
    let raw = re.captures(block)?.get(1)?.as_str();
    let text = clean_text(raw);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn atom_link(block: &str) -> Option<String> {
    let re = HREF_PATTERN.as_ref()?;
    re.captures(block).and_then(|c| c.get(1)).map(|m| decode_entities(m.as_str()))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Unwrap CDATA, decode entities, drop markup and collapse whitespace.
fn clean_text(raw: &str) -> String {
    let unwrapped = raw.trim().trim_start_matches("<![CDATA[").trim_end_matches("]]>");
    let decoded = decode_entities(unwrapped);
    let without_tags = match MARKUP_PATTERN.as_ref() {
        Some(re) => re.replace_all(&decoded, " ").into_owned(),
        None => decoded,
    };
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract RSS 2.0 `<item>`s or Atom `<entry>`s. `None` when the document is
/// not a feed at all.
pub fn parse_feed(xml: &str) -> Option<Vec<FeedEntry>> {
    let lowered = xml.to_lowercase();
    if !(lowered.contains("<rss") || lowered.contains("<feed") || lowered.contains("<rdf:rdf")) {
        return None;
    }

    let item_re = ITEM_PATTERN.as_ref()?;
    let entries = item_re
        .captures_iter(xml)
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
        .map(|block| FeedEntry {
            title: tag_content(block, "title"),
            summary: tag_content(block, "description")
                .or_else(|| tag_content(block, "summary"))
                .or_else(|| tag_content(block, "content")),
            link: tag_content(block, "link").or_else(|| atom_link(block)),
            published: tag_content(block, "pubDate")
                .or_else(|| tag_content(block, "published"))
                .or_else(|| tag_content(block, "updated"))
                .or_else(|| tag_content(block, "dc:date")),
        })
        .collect();
    Some(entries)
}

fn to_article(entry: &FeedEntry, outlet: &str, now: DateTime<Utc>) -> ArticleRecord {
    let published = entry
        .published
        .as_deref()
        .and_then(parse_feed_date)
        .unwrap_or(now);
    ArticleRecord::new(
        entry.title.clone().unwrap_or_else(|| "(untitled)".to_string()),
        entry.summary.clone().unwrap_or_default(),
        outlet,
        published,
        entry.link.clone().unwrap_or_default(),
    )
}

async fn download(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

/// Fetch every configured feed (through the cache), keep items inside the
/// lookback window and return them newest first along with per-feed failures.
pub async fn fetch_rss_articles(
    client: &Client,
    feeds: &[FeedConfig],
    lookback_days: i64,
    ttl_minutes: i64,
    cache: &FileCache,
    now: DateTime<Utc>,
) -> (Vec<ArticleRecord>, Vec<String>) {
    let mut articles = Vec::new();
    let mut failures = Vec::new();
    let cutoff = days_ago(now, lookback_days);

    for feed in feeds {
        if feed.url.trim().is_empty() {
            failures.push(format!("{}: missing URL", feed.name));
            continue;
        }

        let cache_key = format!("rss_{}", feed.url);
        let entries = match cache.get::<Vec<FeedEntry>>(&cache_key, ttl_minutes.saturating_mul(60)) {
            Some(entries) => entries,
            None => {
                info!("Fetching RSS feed {} from {}", feed.name, feed.url);
                let body = match download(client, &feed.url).await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!("RSS fetch failed for {}: {}", feed.url, e);
                        failures.push(format!("{}: fetch error", feed.name));
                        continue;
                    }
                };
                let Some(entries) = parse_feed(&body) else {
                    warn!("RSS parse failed for {}", feed.url);
                    failures.push(format!("{}: parse error", feed.name));
                    continue;
                };
                if let Err(e) = cache.set(&cache_key, &entries) {
                    warn!("Could not cache feed {}: {}", feed.url, e);
                }
                entries
            }
        };

        articles.extend(
            entries
                .iter()
                .map(|entry| to_article(entry, &feed.name, now))
                .filter(|article| article.published >= cutoff),
        );
    }

    articles.sort_by(|a, b| b.published.cmp(&a.published));
    (articles, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>Property Desk</title>
  <item>
    <title>GuocoLand reports construction delay</title>
    <link>https://example.com/news/guocoland-delay</link>
    <description><![CDATA[<p>Delay may push TOP timelines &amp; raise costs.</p>]]></description>
    <pubDate>Wed, 15 Jan 2025 10:30:00 +0800</pubDate>
  </item>
  <item>
    <link>https://example.com/news/old</link>
    <pubDate>Sun, 01 Sep 2024 08:00:00 +0800</pubDate>
  </item>
</channel></rss>"#;

    const ATOM: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title type="text">Lenders grant covenant waiver</title>
    <link rel="alternate" href="https://example.com/news/waiver"/>
    <summary>Temporary breach after valuation decline.</summary>
    <updated>2025-01-14T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items() {
        let entries = parse_feed(RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("GuocoLand reports construction delay"));
        assert_eq!(
            entries[0].summary.as_deref(),
            Some("Delay may push TOP timelines & raise costs.")
        );
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/news/guocoland-delay"));
        assert_eq!(entries[1].title, None);
    }

    #[test]
    fn parses_atom_entries() {
        let entries = parse_feed(ATOM).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Lenders grant covenant waiver"));
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/news/waiver"));
        assert_eq!(entries[0].published.as_deref(), Some("2025-01-14T00:00:00Z"));
    }

    #[test]
    fn html_page_is_not_a_feed() {
        assert_eq!(parse_feed("<html><body>Not found</body></html>"), None);
    }

    #[tokio::test]
    async fn cached_feed_is_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let feed = FeedConfig {
            name: "Business Times".to_string(),
            url: "https://example.invalid/rss".to_string(),
        };
        let mut entries = parse_feed(RSS).unwrap();
        entries.extend(parse_feed(ATOM).unwrap());
        cache.set("rss_https://example.invalid/rss", &entries).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let missing = FeedConfig { name: "Blank".to_string(), url: String::new() };
        let (articles, failures) =
            fetch_rss_articles(&Client::new(), &[feed, missing], 30, 60 * 24 * 365 * 50, &cache, now).await;

        assert_eq!(failures, vec!["Blank: missing URL".to_string()]);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "GuocoLand reports construction delay");
        assert_eq!(articles[1].title, "Lenders grant covenant waiver");
        assert!(articles.iter().all(|a| a.outlet == "Business Times"));
    }

    #[test]
    fn every_feed_tag_has_a_compiled_pattern() {
        assert_eq!(TAG_PATTERNS.len(), FEED_TAGS.len());
        assert!(ITEM_PATTERN.is_some() && HREF_PATTERN.is_some() && MARKUP_PATTERN.is_some());
    }

    #[tokio::test]
    async fn extreme_windows_do_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let feed = FeedConfig {
            name: "Edge".to_string(),
            url: "https://example.invalid/edge".to_string(),
        };
        let mut entries = parse_feed(RSS).unwrap();
        entries.extend(parse_feed(ATOM).unwrap());
        cache.set("rss_https://example.invalid/edge", &entries).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let (articles, failures) =
            fetch_rss_articles(&Client::new(), &[feed], i64::MAX / 2, i64::MAX, &cache, now).await;
        assert!(failures.is_empty());
        assert_eq!(articles.len(), 3);
    }

    #[test]
    fn undated_untitled_entry_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let entry = FeedEntry { title: None, summary: None, link: None, published: Some("soon".into()) };
        let article = to_article(&entry, "CNA", now);
        assert_eq!(article.title, "(untitled)");
        assert_eq!(article.published, now);
        assert_eq!(article.theme, "general");
    }
}
