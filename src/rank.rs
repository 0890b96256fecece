// src/rank.rs
//! # Event ranking
//! Importance scoring and top-N selection for clustered events.
//!
//! `score = source_count * avg_tier_weight * (1 + e^(-recency_weight * hours_old))`
//!
//! Source count dominates (more independent coverage means a bigger story),
//! tier weights favor wire services over magazines, and the exponential
//! recency term boosts fresh events. `hours_old` is deliberately not
//! clamped: a future-dated item (clock skew) yields a factor above 1 and
//! the event ranks correspondingly higher.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::model::{Event, Tier};
use crate::sources::SourceDirectory;

/// Ranking knobs. All fields have compiled-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_wire_weight")]
    pub wire_weight: f64,
    #[serde(default = "default_news_weight")]
    pub news_weight: f64,
    #[serde(default = "default_magazine_weight")]
    pub magazine_weight: f64,
    /// Decay rate per hour of age for the recency factor.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    /// Maximum events kept in the brief after ranking.
    #[serde(default = "default_max_events_in_brief")]
    pub max_events_in_brief: usize,
}

fn default_wire_weight() -> f64 {
    3.0
}
fn default_news_weight() -> f64 {
    2.0
}
fn default_magazine_weight() -> f64 {
    1.0
}
fn default_recency_weight() -> f64 {
    0.1
}
fn default_max_events_in_brief() -> usize {
    10
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            wire_weight: default_wire_weight(),
            news_weight: default_news_weight(),
            magazine_weight: default_magazine_weight(),
            recency_weight: default_recency_weight(),
            max_events_in_brief: default_max_events_in_brief(),
        }
    }
}

impl RankingConfig {
    pub fn tier_weight(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Wire => self.wire_weight,
            Tier::News => self.news_weight,
            Tier::Magazine => self.magazine_weight,
        }
    }
}

/// Importance score for one event, relative to `now`. Non-negative; used
/// purely for ordering, no fixed scale.
pub fn calculate_event_score(
    event: &Event,
    config: &RankingConfig,
    directory: &SourceDirectory,
    now: DateTime<Utc>,
) -> f64 {
    let source_ids = event.source_ids();
    let source_count = source_ids.len();

    let base_score = source_count as f64;

    let tier_sum: f64 = source_ids
        .iter()
        .map(|id| config.tier_weight(directory.tier_of(id)))
        .sum();
    let avg_tier_weight = if source_count > 0 {
        tier_sum / source_count as f64
    } else {
        1.0
    };

    let hours_old = (now - event.most_recent_time()).num_seconds() as f64 / 3600.0;
    let recency_factor = (-config.recency_weight * hours_old).exp();

    base_score * avg_tier_weight * (1.0 + recency_factor)
}

/// Score and sort events, highest first. Equal scores preserve the input
/// order (stable sort), so output is deterministic for a fixed input.
pub fn rank_events(
    mut events: Vec<Event>,
    config: &RankingConfig,
    directory: &SourceDirectory,
    now: DateTime<Utc>,
) -> Vec<Event> {
    if events.is_empty() {
        return events;
    }

    info!(events = events.len(), "ranking events");

    for event in events.iter_mut() {
        event.score = calculate_event_score(event, config, directory, now);
    }

    events.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    for (i, event) in events.iter().take(5).enumerate() {
        info!(
            rank = i + 1,
            score = event.score,
            sources = event.source_count(),
            title = %event.canonical_title,
            "top event"
        );
    }

    events
}

/// Rank and truncate to the configured maximum for the brief.
pub fn select_top_events(
    events: Vec<Event>,
    config: &RankingConfig,
    directory: &SourceDirectory,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let mut ranked = rank_events(events, config, directory, now);
    ranked.truncate(config.max_events_in_brief);
    info!(selected = ranked.len(), "selected top events for brief");
    ranked
}
