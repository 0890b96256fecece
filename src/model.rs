// src/model.rs
//! Data model shared by the ingest, clustering, ranking, and rendering stages.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credibility tier of a source, used to weight event scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Wire,
    News,
    Magazine,
}

/// A configured news source (one RSS feed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub rss_url: String,
    pub tier: Tier,
    pub region: String,
}

/// One ingested article. Immutable once built by the ingest stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source_id: String,
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub fetched_at: DateTime<Utc>,
    /// Content fingerprint (sha256 of guid-or-link, first 16 hex chars).
    pub guid_hash: String,
}

/// A clustered news event: multiple articles believed to describe the same
/// real-world occurrence. Built by the cluster engine, annotated once by the
/// title selector (`canonical_title`) and once by the scorer (`score`), then
/// treated as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub items: Vec<NewsItem>,
    pub created_at: DateTime<Utc>,
    pub canonical_title: String,
    pub score: f64,
}

impl Event {
    /// Invariant: `items` must be non-empty.
    pub fn from_items(items: Vec<NewsItem>) -> Self {
        debug_assert!(!items.is_empty(), "an event must contain at least one item");
        // Items arrive newest-first from the cluster engine.
        let created_at = items[0].published_at;
        Self {
            items,
            created_at,
            canonical_title: String::new(),
            score: 0.0,
        }
    }

    /// Number of distinct sources reporting this event.
    pub fn source_count(&self) -> usize {
        self.items
            .iter()
            .map(|it| it.source_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Distinct source ids, in deterministic (sorted) order.
    pub fn source_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|it| it.source_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Most recent publication time among all member items.
    pub fn most_recent_time(&self) -> DateTime<Utc> {
        self.items
            .iter()
            .map(|it| it.published_at)
            .max()
            .unwrap_or(self.created_at)
    }
}
