// src/ingest/feeds.rs
//! Feed roster loading: which sources exist, their tiers, and their URLs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::model::Source;

pub const ENV_FEEDS_PATH: &str = "BRIEFER_FEEDS_PATH";
pub const DEFAULT_FEEDS_PATH: &str = "config/feeds.toml";

#[derive(Debug, Deserialize)]
struct FeedsFile {
    #[serde(default)]
    feeds: Vec<Source>,
}

/// Parse the feed roster from an explicit path. Supports TOML or JSON
/// (a bare array of sources).
pub fn load_feeds_from(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_feeds(&content, ext.as_str())
        .with_context(|| format!("parsing feeds from {}", path.display()))
}

fn parse_feeds(s: &str, hint_ext: &str) -> Result<Vec<Source>> {
    if hint_ext == "json" {
        let v: Vec<Source> = serde_json::from_str(s)?;
        return Ok(v);
    }
    let parsed: FeedsFile = toml::from_str(s)?;
    Ok(parsed.feeds)
}

/// Load the feed roster using env var + fallback:
/// 1) $BRIEFER_FEEDS_PATH (must exist if set)
/// 2) config/feeds.toml
/// 3) empty roster
pub fn load_feeds_default() -> Result<Vec<Source>> {
    if let Ok(p) = std::env::var(ENV_FEEDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feeds_from(&pb);
        }
        return Err(anyhow!("BRIEFER_FEEDS_PATH points to non-existent path"));
    }
    let default_path = PathBuf::from(DEFAULT_FEEDS_PATH);
    if default_path.exists() {
        return load_feeds_from(&default_path);
    }
    Ok(Vec::new())
}
