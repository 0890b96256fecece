// src/ingest/mod.rs
pub mod feeds;
pub mod providers;
pub mod types;

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::ingest::types::FeedProvider;
use crate::model::NewsItem;

/// One-time metrics registration (so series show up on the embedder's
/// exporter).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("briefer_items_fetched_total", "Items parsed from feeds.");
        describe_counter!(
            "briefer_items_dedup_total",
            "Items dropped by fingerprint deduplication."
        );
        describe_counter!(
            "briefer_items_stale_total",
            "Items dropped for falling outside the lookback window."
        );
        describe_counter!("briefer_feed_errors_total", "Feed fetch/parse errors.");
        describe_histogram!("briefer_feed_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "briefer_last_ingest_ts",
            "Unix timestamp of the last completed ingest run."
        );
    });
}

/// Deterministic content fingerprint for deduplication: sha256 of the feed
/// guid (or link), first 16 hex chars.
pub fn make_guid_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..16].to_string()
}

/// Normalize feed text: decode HTML entities, strip tags, normalize
/// typographic quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Drop items whose fingerprint was already seen, keeping the first
/// occurrence. Returns (kept, dropped_count).
pub fn dedup_items(items: Vec<NewsItem>) -> (Vec<NewsItem>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for item in items {
        if seen.insert(item.guid_hash.clone()) {
            kept.push(item);
        } else {
            dropped += 1;
        }
    }

    (kept, dropped)
}

/// Keep only items published within the lookback window ending at `now`.
/// Future-dated items are kept; the scorer handles them explicitly.
pub fn recent_items(
    items: Vec<NewsItem>,
    now: DateTime<Utc>,
    lookback_hours: i64,
) -> (Vec<NewsItem>, usize) {
    let cutoff = now - Duration::hours(lookback_hours);
    let before = items.len();
    let kept: Vec<NewsItem> = items
        .into_iter()
        .filter(|it| it.published_at >= cutoff)
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Fetch from all providers once, then dedup and apply the lookback window.
/// A failing provider logs a warning and contributes nothing; the run
/// continues with the remaining feeds.
pub async fn run_once(
    providers: &[Box<dyn FeedProvider>],
    now: DateTime<Utc>,
    lookback_hours: i64,
) -> Vec<NewsItem> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut items) => {
                info!(source = p.source_id(), items = items.len(), "fetched feed");
                raw.append(&mut items);
            }
            Err(e) => {
                warn!(error = ?e, source = p.source_id(), "feed error");
                counter!("briefer_feed_errors_total").increment(1);
            }
        }
    }

    counter!("briefer_items_fetched_total").increment(raw.len() as u64);

    let (unique, dup_count) = dedup_items(raw);
    let (fresh, stale_count) = recent_items(unique, now, lookback_hours);

    counter!("briefer_items_dedup_total").increment(dup_count as u64);
    counter!("briefer_items_stale_total").increment(stale_count as u64);
    gauge!("briefer_last_ingest_ts").set(now.timestamp() as f64);

    info!(
        kept = fresh.len(),
        duplicates = dup_count,
        stale = stale_count,
        "ingest run complete"
    );

    fresh
}
