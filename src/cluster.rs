// src/cluster.rs
//! # Cluster engine
//! Greedy clustering of news items into events by title similarity.
//!
//! Pure, synchronous logic over an in-memory slice of items. Items are
//! processed newest-first; each item joins the most similar existing
//! cluster above its threshold or opens a new one. Financial and general
//! items never share a cluster, and financial items use a lower threshold
//! because financial headlines are templated and vary less.

use metrics::counter;
use serde::Deserialize;
use tracing::info;

use crate::model::{Event, NewsItem};
use crate::similarity::{jaccard_similarity, title_tokens};
use crate::sources::SourceDirectory;

/// Clustering thresholds. All fields have compiled-in defaults so partial
/// config files work.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringConfig {
    /// Minimum title similarity for an item to join a general cluster.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Lower bar applied when the incoming item is from a financial source.
    #[serde(default = "default_financial_similarity_threshold")]
    pub financial_similarity_threshold: f64,
    /// Events reported by fewer distinct sources than this are dropped.
    /// Values <= 1 disable the filter.
    #[serde(default = "default_min_sources_per_event")]
    pub min_sources_per_event: usize,
}

fn default_similarity_threshold() -> f64 {
    0.35
}
fn default_financial_similarity_threshold() -> f64 {
    0.25
}
fn default_min_sources_per_event() -> usize {
    2
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            financial_similarity_threshold: default_financial_similarity_threshold(),
            min_sources_per_event: default_min_sources_per_event(),
        }
    }
}

/// One open cluster during the greedy pass. Token sets are computed once
/// per item so the O(n²) comparison loop never re-tokenizes.
struct OpenCluster {
    items: Vec<NewsItem>,
    token_sets: Vec<std::collections::HashSet<String>>,
    is_financial: bool,
}

/// Cluster items into events.
///
/// Processing order is part of the contract: items are sorted newest-first,
/// and on equal best similarity the earliest-created cluster wins (strict
/// `>` when updating the best candidate). Returns surviving events in
/// cluster-creation order; ranking is a separate stage.
pub fn cluster_items(
    items: &[NewsItem],
    config: &ClusteringConfig,
    directory: &SourceDirectory,
) -> Vec<Event> {
    if items.is_empty() {
        return Vec::new();
    }

    info!(
        items = items.len(),
        threshold = config.similarity_threshold,
        min_sources = config.min_sources_per_event,
        "clustering items"
    );

    // 1) Sort newest-first. Order decides which cluster absorbs borderline
    //    items, so this is load-bearing.
    let mut sorted: Vec<&NewsItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    // 2) Greedy assignment against the ordered list of open clusters.
    let mut clusters: Vec<OpenCluster> = Vec::new();

    for item in sorted {
        let is_financial = directory.is_financial(&item.source_id);
        let item_threshold = if is_financial {
            config.financial_similarity_threshold
        } else {
            config.similarity_threshold
        };
        let tokens = title_tokens(&item.title);

        let mut best_idx: Option<usize> = None;
        let mut best_similarity = 0.0f64;

        for (idx, cluster) in clusters.iter().enumerate() {
            // Financial items never merge into general clusters and vice
            // versa.
            if is_financial != cluster.is_financial {
                continue;
            }

            let max_sim = cluster
                .token_sets
                .iter()
                .map(|member| jaccard_similarity(&tokens, member))
                .fold(0.0f64, f64::max);

            // Strict `>` keeps the earliest-created cluster on ties.
            if max_sim > best_similarity {
                best_similarity = max_sim;
                best_idx = Some(idx);
            }
        }

        match best_idx {
            Some(idx) if best_similarity >= item_threshold => {
                clusters[idx].items.push(item.clone());
                clusters[idx].token_sets.push(tokens);
                // A cluster is financial if any member is.
                clusters[idx].is_financial |= is_financial;
            }
            _ => clusters.push(OpenCluster {
                items: vec![item.clone()],
                token_sets: vec![tokens],
                is_financial,
            }),
        }
    }

    info!(clusters = clusters.len(), "created initial clusters");
    counter!("briefer_clusters_total").increment(clusters.len() as u64);

    // 3) Convert to events. The first item in each cluster is the newest
    //    processed into it, so its publish time is the creation time.
    let mut events: Vec<Event> = clusters
        .into_iter()
        .map(|c| Event::from_items(c.items))
        .collect();

    // 4) Drop single-source events unless the config allows them.
    if config.min_sources_per_event > 1 {
        let before = events.len();
        events.retain(|e| e.source_count() >= config.min_sources_per_event);
        info!(
            kept = events.len(),
            dropped = before - events.len(),
            min_sources = config.min_sources_per_event,
            "filtered events by source count"
        );
    }

    counter!("briefer_events_total").increment(events.len() as u64);
    events
}

/// Split events into (general, financial). An event is financial when a
/// strict majority of its member items come from financial sources.
pub fn categorize_events(
    events: Vec<Event>,
    directory: &SourceDirectory,
) -> (Vec<Event>, Vec<Event>) {
    let mut general = Vec::new();
    let mut financial = Vec::new();

    for event in events {
        let financial_count = event
            .items
            .iter()
            .filter(|it| directory.is_financial(&it.source_id))
            .count();
        if financial_count * 2 > event.items.len() {
            financial.push(event);
        } else {
            general.push(event);
        }
    }

    (general, financial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceDirectoryConfig;
    use chrono::{TimeZone, Utc};

    fn mk_item(source: &str, title: &str, minute: u32) -> NewsItem {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 8, minute, 0).unwrap();
        NewsItem {
            source_id: source.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{source}/{minute}"),
            published_at: ts,
            summary: None,
            fetched_at: ts,
            guid_hash: format!("{source}-{minute}"),
        }
    }

    fn directory_with_financial(ids: &[&str]) -> SourceDirectory {
        SourceDirectory::new(
            &[],
            &SourceDirectoryConfig {
                financial_sources: ids.iter().map(|s| s.to_string()).collect(),
                wire_prefixes: vec![],
            },
        )
    }

    fn no_filter() -> ClusteringConfig {
        ClusteringConfig {
            min_sources_per_event: 1,
            ..ClusteringConfig::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let events = cluster_items(
            &[],
            &ClusteringConfig::default(),
            &SourceDirectory::empty(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn similar_titles_merge_into_one_event() {
        let items = vec![
            mk_item("bbc", "Fed raises interest rates", 10),
            mk_item("guardian", "Fed raises rates", 5),
        ];
        let events = cluster_items(&items, &no_filter(), &SourceDirectory::empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source_count(), 2);
    }

    #[test]
    fn dissimilar_titles_stay_apart() {
        let items = vec![
            mk_item("bbc", "Fed raises interest rates", 10),
            mk_item("guardian", "Cat stuck in tree rescued", 5),
        ];
        let events = cluster_items(&items, &no_filter(), &SourceDirectory::empty());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn min_sources_filter_drops_single_source_events() {
        let items = vec![mk_item("bbc", "Cat stuck in tree", 10)];
        let events = cluster_items(
            &items,
            &ClusteringConfig::default(),
            &SourceDirectory::empty(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn financial_items_never_join_general_clusters() {
        let dir = directory_with_financial(&["ft"]);
        let items = vec![
            mk_item("bbc", "Markets rally on rate cut hopes", 10),
            mk_item("ft", "Markets rally on rate cut hopes", 5),
        ];
        let events = cluster_items(&items, &no_filter(), &dir);
        // Identical titles, but the financial/general gate keeps them apart.
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn financial_threshold_is_lower() {
        let dir = directory_with_financial(&["ft", "bloomberg"]);
        // Similarity here is 1/3 ≈ 0.333: below 0.35, above 0.25.
        let items = vec![
            mk_item("ft", "Dollar climbs", 10),
            mk_item("bloomberg", "Dollar slips", 5),
        ];
        let events = cluster_items(&items, &no_filter(), &dir);
        assert_eq!(events.len(), 1, "financial items merge at 0.25 threshold");

        let general_dir = SourceDirectory::empty();
        let events = cluster_items(&items, &no_filter(), &general_dir);
        assert_eq!(events.len(), 2, "general items stay apart at 0.35");
    }

    #[test]
    fn newest_item_defines_event_creation_time() {
        let items = vec![
            mk_item("bbc", "Fed raises interest rates", 5),
            mk_item("guardian", "Fed raises interest rates", 30),
        ];
        let events = cluster_items(&items, &no_filter(), &SourceDirectory::empty());
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].created_at,
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(events[0].most_recent_time(), events[0].created_at);
    }

    #[test]
    fn partition_covers_every_item_exactly_once() {
        let items = vec![
            mk_item("bbc", "Fed raises interest rates", 10),
            mk_item("guardian", "Federal Reserve raises interest rates", 9),
            mk_item("cnn", "Storm hits coast", 8),
            mk_item("bbc", "Cat stuck in tree", 7),
        ];
        let events = cluster_items(&items, &no_filter(), &SourceDirectory::empty());
        let mut seen: Vec<&str> = events
            .iter()
            .flat_map(|e| e.items.iter().map(|it| it.guid_hash.as_str()))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = items.iter().map(|it| it.guid_hash.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn majority_vote_categorization() {
        let dir = directory_with_financial(&["ft", "bloomberg"]);
        let financial_event = Event::from_items(vec![
            mk_item("ft", "Markets rally", 10),
            mk_item("bloomberg", "Markets rally today", 9),
            mk_item("bbc", "Markets rally worldwide", 8),
        ]);
        let general_event = Event::from_items(vec![
            mk_item("ft", "Markets rally", 10),
            mk_item("bbc", "Markets rally worldwide", 8),
        ]);
        let (general, financial) = categorize_events(vec![financial_event, general_event], &dir);
        assert_eq!(financial.len(), 1);
        assert_eq!(financial[0].items.len(), 3);
        // An even split is not a strict majority.
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].items.len(), 2);
    }
}
