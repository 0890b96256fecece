// src/ingest/providers/rss.rs
//! Generic RSS 2.0 provider. One instance per configured source; parses
//! either a fixture string (tests, offline runs) or a fetched HTTP body.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::warn;

use crate::ingest::types::FeedProvider;
use crate::ingest::{make_guid_hash, normalize_text};
use crate::model::{NewsItem, Source};

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
    guid: Option<Guid>,
}

#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Parse a feed date: RFC 2822 first (the RSS norm), RFC 3339 as a
/// fallback for Atom-flavored feeds.
fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub struct RssFeedProvider {
    source: Source,
    mode: Mode,
}

enum Mode {
    /// Own a copy of the XML so tests don't need 'static fixtures.
    Fixture(String),
    Http { client: reqwest::Client },
}

impl RssFeedProvider {
    pub fn from_source(source: Source) -> Self {
        Self {
            source,
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture(source: Source, xml: &str) -> Self {
        Self {
            source,
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    fn parse_items(&self, xml: &str, fetched_at: DateTime<Utc>) -> Result<Vec<NewsItem>> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(xml)
            .with_context(|| format!("parsing rss xml for {}", self.source.id))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                warn!(source = %self.source.id, "entry missing title, skipped");
                continue;
            }
            let link = it.link.as_deref().unwrap_or_default().trim().to_string();
            if link.is_empty() {
                warn!(source = %self.source.id, title = %title, "entry missing link, skipped");
                continue;
            }

            let published_at = match it.pub_date.as_deref().and_then(parse_pub_date) {
                Some(dt) => dt,
                None => {
                    // Documented policy: undated entries take the fetch time.
                    warn!(source = %self.source.id, title = %title, "no parsable date, using fetch time");
                    fetched_at
                }
            };

            let summary = it
                .description
                .as_deref()
                .map(normalize_text)
                .filter(|s| !s.is_empty());

            // Prefer the feed guid, fall back to the link.
            let guid = it
                .guid
                .and_then(|g| g.value)
                .unwrap_or_else(|| link.clone());

            out.push(NewsItem {
                source_id: self.source.id.clone(),
                title,
                link,
                published_at,
                summary,
                fetched_at,
                guid_hash: make_guid_hash(&guid),
            });
        }

        // run_once counts fetched items; only the parse timing lives here.
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("briefer_feed_parse_ms").record(ms);
        Ok(out)
    }
}

#[async_trait]
impl FeedProvider for RssFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        let fetched_at = Utc::now();
        match &self.mode {
            Mode::Fixture(xml) => self.parse_items(xml, fetched_at),
            Mode::Http { client } => {
                let body = client
                    .get(&self.source.rss_url)
                    .send()
                    .await
                    .with_context(|| format!("fetching feed {}", self.source.rss_url))?
                    .text()
                    .await
                    .with_context(|| format!("reading feed body {}", self.source.rss_url))?;
                self.parse_items(&body, fetched_at)
            }
        }
    }

    fn source_id(&self) -> &str {
        &self.source.id
    }
}
