// src/title.rs
//! Canonical title selection for clustered events.
//!
//! Wire-service headlines tend to be the tersest and clearest statement of
//! a story, so they are preferred; within the preferred pool the shortest
//! title wins, first-encountered on equal length.

use anyhow::{bail, Result};

use crate::model::Event;
use crate::sources::SourceDirectory;

/// Pick the canonical display title for an event.
///
/// Among items from wire-service sources, returns the shortest title by
/// character length; if no wire item exists, the shortest title overall.
/// Errors only on an empty event, which the cluster engine never produces.
pub fn select_canonical_title(event: &Event, directory: &SourceDirectory) -> Result<String> {
    if event.items.is_empty() {
        bail!("cannot select a title for an event with no items");
    }

    // `min_by_key` keeps the first of equal-length titles, which makes the
    // tie-break deterministic in member order.
    let wire_best = event
        .items
        .iter()
        .filter(|it| directory.is_wire(&it.source_id))
        .min_by_key(|it| it.title.chars().count());

    if let Some(item) = wire_best {
        return Ok(item.title.clone());
    }

    let best = event
        .items
        .iter()
        .min_by_key(|it| it.title.chars().count())
        .map(|it| it.title.clone());
    Ok(best.unwrap_or_default())
}
