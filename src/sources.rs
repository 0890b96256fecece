// src/sources.rs
//! # Source directory
//!
//! One central lookup for everything the pipeline wants to know about a
//! source id: its credibility tier, whether it is a wire service, and
//! whether it is a financial source. The cluster engine, title selector,
//! and scorer all share this lookup so the classification rules live in
//! exactly one place.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::model::{Source, Tier};

/// Prefixes identifying wire-service source ids (e.g. `reuters-world`,
/// `ap-top`).
pub const DEFAULT_WIRE_PREFIXES: &[&str] = &["reuters", "ap"];

/// Config shape for the directory, embeddable in settings files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDirectoryConfig {
    /// Source ids treated as financial (lower clustering threshold,
    /// financial categorization).
    #[serde(default)]
    pub financial_sources: Vec<String>,
    /// Wire-service id prefixes; empty means use the built-in defaults.
    #[serde(default)]
    pub wire_prefixes: Vec<String>,
}

/// Tier, wire, and financial classification for all configured sources.
#[derive(Debug, Clone)]
pub struct SourceDirectory {
    tiers: HashMap<String, Tier>,
    financial: HashSet<String>,
    wire_prefixes: Vec<String>,
}

impl SourceDirectory {
    pub fn new(sources: &[Source], config: &SourceDirectoryConfig) -> Self {
        let tiers = sources
            .iter()
            .map(|s| (s.id.clone(), s.tier))
            .collect::<HashMap<_, _>>();
        let financial = config
            .financial_sources
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<_>>();
        let wire_prefixes = if config.wire_prefixes.is_empty() {
            DEFAULT_WIRE_PREFIXES.iter().map(|p| p.to_string()).collect()
        } else {
            config.wire_prefixes.clone()
        };
        Self {
            tiers,
            financial,
            wire_prefixes,
        }
    }

    /// Directory with no configured sources: every lookup falls back to
    /// defaults (`news` tier, built-in wire prefixes, nothing financial).
    pub fn empty() -> Self {
        Self::new(&[], &SourceDirectoryConfig::default())
    }

    /// Tier of a source id; unknown sources default to `news`.
    pub fn tier_of(&self, source_id: &str) -> Tier {
        self.tiers.get(source_id).copied().unwrap_or(Tier::News)
    }

    /// Whether a source id denotes a wire service (prefix match).
    pub fn is_wire(&self, source_id: &str) -> bool {
        self.wire_prefixes
            .iter()
            .any(|p| source_id.starts_with(p.as_str()))
    }

    /// Whether a source id is in the configured financial set.
    pub fn is_financial(&self, source_id: &str) -> bool {
        self.financial.contains(source_id)
    }

    pub fn financial_source_count(&self) -> usize {
        self.financial.len()
    }
}
