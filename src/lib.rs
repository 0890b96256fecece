// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod brief;
pub mod brief_html;
pub mod cluster;
pub mod config;
pub mod ingest;
pub mod model;
pub mod rank;
pub mod similarity;
pub mod sources;
pub mod title;

// ---- Re-exports for stable public API ----
pub use crate::brief_html::render_html_brief;
pub use crate::cluster::{categorize_events, cluster_items, ClusteringConfig};
pub use crate::config::Settings;
pub use crate::model::{Event, NewsItem, Source, Tier};
pub use crate::rank::{calculate_event_score, rank_events, select_top_events, RankingConfig};
pub use crate::similarity::title_similarity;
pub use crate::sources::SourceDirectory;
pub use crate::title::select_canonical_title;
