// src/config.rs
//! Settings loading for the briefer pipeline.
//!
//! All knobs live in one TOML file (default `config/settings.toml`) and
//! every field has a compiled-in default, so a missing or partial file
//! still produces a usable configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::cluster::ClusteringConfig;
use crate::rank::RankingConfig;
use crate::sources::SourceDirectoryConfig;

pub const ENV_SETTINGS_PATH: &str = "BRIEFER_SETTINGS_PATH";
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";

/// Top-level pipeline settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Only items published within this window are clustered.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
    /// Cap on source links rendered per event in the brief.
    #[serde(default = "default_max_sources_per_event")]
    pub max_sources_per_event: usize,
    /// Directory the rendered brief and its archive land in.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub sources: SourceDirectoryConfig,
}

fn default_lookback_hours() -> i64 {
    24
}
fn default_max_sources_per_event() -> usize {
    5
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            max_sources_per_event: default_max_sources_per_event(),
            output_dir: default_output_dir(),
            clustering: ClusteringConfig::default(),
            ranking: RankingConfig::default(),
            sources: SourceDirectoryConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing settings from {}", path.display()))
    }

    /// Load settings using env var + fallbacks:
    /// 1) $BRIEFER_SETTINGS_PATH (must exist if set)
    /// 2) config/settings.toml
    /// 3) compiled-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SETTINGS_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("BRIEFER_SETTINGS_PATH points to non-existent path"));
        }
        let default_path = PathBuf::from(DEFAULT_SETTINGS_PATH);
        if default_path.exists() {
            return Self::load_from(&default_path);
        }
        info!("no settings file found, using compiled-in defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn partial_toml_fills_defaults() {
        let s: Settings = toml::from_str(
            r#"
            lookback_hours = 12

            [clustering]
            similarity_threshold = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(s.lookback_hours, 12);
        assert!((s.clustering.similarity_threshold - 0.5).abs() < 1e-9);
        // Untouched fields keep their defaults.
        assert!((s.clustering.financial_similarity_threshold - 0.25).abs() < 1e-9);
        assert_eq!(s.clustering.min_sources_per_event, 2);
        assert_eq!(s.ranking.max_events_in_brief, 10);
        assert_eq!(s.max_sources_per_event, 5);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let s: Settings = toml::from_str("").unwrap();
        assert_eq!(s.lookback_hours, 24);
        assert!((s.clustering.similarity_threshold - 0.35).abs() < 1e-9);
        assert!((s.ranking.recency_weight - 0.1).abs() < 1e-9);
        assert!(s.sources.financial_sources.is_empty());
    }

    #[serial_test::serial]
    #[test]
    fn load_default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ does not interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_SETTINGS_PATH);

        // No files in the temp CWD: compiled-in defaults.
        let s = Settings::load_default().unwrap();
        assert_eq!(s.lookback_hours, 24);

        // Env var takes precedence.
        let p = tmp.path().join("settings.toml");
        std::fs::write(&p, "lookback_hours = 6\n").unwrap();
        env::set_var(ENV_SETTINGS_PATH, p.display().to_string());
        let s2 = Settings::load_default().unwrap();
        assert_eq!(s2.lookback_hours, 6);
        env::remove_var(ENV_SETTINGS_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
