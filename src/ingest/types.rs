// src/ingest/types.rs
use anyhow::Result;

use crate::model::NewsItem;

/// One configured feed the pipeline can pull items from.
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch and parse the latest items. Implementations normalize titles
    /// and fill every `NewsItem` field, including the dedup fingerprint.
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>>;
    /// Source id this provider ingests for.
    fn source_id(&self) -> &str;
}
