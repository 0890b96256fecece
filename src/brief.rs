// src/brief.rs
//! Markdown rendering of the morning brief, plus date-stamped archiving.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::model::{Event, Source, Tier};
use crate::sources::SourceDirectory;

/// Render one event: bold canonical headline plus a capped list of source
/// links, wire services first, newest first within a tier.
fn render_event(
    event: &Event,
    names: &HashMap<&str, &str>,
    directory: &SourceDirectory,
    max_sources: usize,
) -> String {
    let tier_priority = |source_id: &str| match directory.tier_of(source_id) {
        Tier::Wire => 3,
        Tier::News => 2,
        Tier::Magazine => 1,
    };

    let mut sorted: Vec<_> = event.items.iter().collect();
    sorted.sort_by(|a, b| {
        (tier_priority(&b.source_id), b.published_at)
            .cmp(&(tier_priority(&a.source_id), a.published_at))
    });

    let display = &sorted[..sorted.len().min(max_sources)];
    let remaining = sorted.len() - display.len();

    let mut source_line = display
        .iter()
        .map(|it| {
            let name = names
                .get(it.source_id.as_str())
                .copied()
                .unwrap_or(it.source_id.as_str());
            format!("[{}]({})", name, it.link)
        })
        .collect::<Vec<_>>()
        .join(", ");

    if remaining > 0 {
        source_line.push_str(&format!(" (+{remaining} more)"));
    }

    format!("- **{}**\n  - {}\n", event.canonical_title, source_line)
}

/// Render the complete brief as Markdown. Events are expected to arrive
/// already ranked and truncated.
pub fn render_brief(
    events: &[Event],
    sources: &[Source],
    directory: &SourceDirectory,
    max_sources_per_event: usize,
    now: DateTime<Utc>,
) -> String {
    let names: HashMap<&str, &str> = sources
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();

    let mut lines = vec![
        format!("# Morning Brief — {}", now.format("%Y-%m-%d")),
        String::new(),
        format!("*Generated: {}*", now.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
    ];

    if events.is_empty() {
        lines.push("*No events to report.*".to_string());
        lines.push(String::new());
    } else {
        for event in events {
            lines.push(render_event(event, &names, directory, max_sources_per_event));
        }
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    let mut stats = format!("**Stats**: {} events", events.len());
    if !events.is_empty() {
        let total_items: usize = events.iter().map(|e| e.items.len()).sum();
        let total_sources: usize = events.iter().map(|e| e.source_count()).sum();
        stats.push_str(&format!(
            " | {total_items} articles | {total_sources} distinct source mentions"
        ));
    }
    lines.push(stats);
    lines.push(String::new());

    lines.join("\n")
}

/// Write the rendered brief to `<output_dir>/brief.md`.
pub fn write_brief(markdown: &str, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;
    let path = output_dir.join("brief.md");
    fs::write(&path, markdown)
        .with_context(|| format!("writing brief to {}", path.display()))?;
    info!(path = %path.display(), "brief written");
    Ok(path)
}

/// Copy the current brief to `<output_dir>/archive/brief_<date>.md`.
pub fn archive_brief(output_dir: &Path, date: DateTime<Utc>) -> Result<()> {
    let source = output_dir.join("brief.md");
    if !source.exists() {
        warn!("no brief to archive");
        return Ok(());
    }

    let archive_dir = output_dir.join("archive");
    fs::create_dir_all(&archive_dir)
        .with_context(|| format!("creating archive dir {}", archive_dir.display()))?;
    let target = archive_dir.join(format!("brief_{}.md", date.format("%Y-%m-%d")));
    fs::copy(&source, &target)
        .with_context(|| format!("archiving brief to {}", target.display()))?;
    info!(path = %target.display(), "brief archived");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewsItem;
    use crate::sources::SourceDirectoryConfig;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap()
    }

    fn mk_item(source: &str, title: &str, minute: u32) -> NewsItem {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 6, minute, 0).unwrap();
        NewsItem {
            source_id: source.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{source}"),
            published_at: ts,
            summary: None,
            fetched_at: ts,
            guid_hash: format!("{source}-{minute}"),
        }
    }

    fn mk_source(id: &str, name: &str, tier: Tier) -> Source {
        Source {
            id: id.to_string(),
            name: name.to_string(),
            rss_url: format!("https://{id}.example.com/rss"),
            tier,
            region: "global".to_string(),
        }
    }

    fn roster() -> Vec<Source> {
        vec![
            mk_source("reuters-world", "Reuters", Tier::Wire),
            mk_source("bbc", "BBC News", Tier::News),
            mk_source("economist", "The Economist", Tier::Magazine),
        ]
    }

    #[test]
    fn wire_sources_are_listed_first() {
        let sources = roster();
        let dir = SourceDirectory::new(&sources, &SourceDirectoryConfig::default());
        let mut event = Event::from_items(vec![
            mk_item("economist", "Markets rally worldwide", 30),
            mk_item("bbc", "Markets rally", 20),
            mk_item("reuters-world", "Markets rally today", 10),
        ]);
        event.canonical_title = "Markets rally".to_string();

        let md = render_event(&event, &HashMap::new(), &dir, 5);
        let reuters = md.find("reuters-world").unwrap();
        let bbc = md.find("bbc").unwrap();
        let economist = md.find("economist").unwrap();
        assert!(reuters < bbc && bbc < economist);
    }

    #[test]
    fn source_cap_adds_more_suffix() {
        let sources = roster();
        let dir = SourceDirectory::new(&sources, &SourceDirectoryConfig::default());
        let mut event = Event::from_items(vec![
            mk_item("a", "t", 1),
            mk_item("b", "t", 2),
            mk_item("c", "t", 3),
        ]);
        event.canonical_title = "t".to_string();
        let md = render_event(&event, &HashMap::new(), &dir, 2);
        assert!(md.contains("(+1 more)"));
    }

    #[test]
    fn empty_brief_renders_placeholder() {
        let sources = roster();
        let dir = SourceDirectory::new(&sources, &SourceDirectoryConfig::default());
        let md = render_brief(&[], &sources, &dir, 5, now());
        assert!(md.contains("# Morning Brief — 2025-06-01"));
        assert!(md.contains("*No events to report.*"));
        assert!(md.contains("**Stats**: 0 events"));
    }

    #[test]
    fn brief_uses_display_names_and_stats() {
        let sources = roster();
        let dir = SourceDirectory::new(&sources, &SourceDirectoryConfig::default());
        let mut event = Event::from_items(vec![
            mk_item("reuters-world", "Markets rally", 10),
            mk_item("bbc", "Markets rally worldwide", 20),
        ]);
        event.canonical_title = "Markets rally".to_string();
        let md = render_brief(&[event], &sources, &dir, 5, now());
        assert!(md.contains("- **Markets rally**"));
        assert!(md.contains("[Reuters](https://example.com/reuters-world)"));
        assert!(md.contains("[BBC News](https://example.com/bbc)"));
        assert!(md.contains("**Stats**: 1 events | 2 articles | 2 distinct source mentions"));
    }

    #[test]
    fn write_and_archive_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let md = "# Morning Brief\n";
        let path = write_brief(md, tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), md);

        archive_brief(tmp.path(), now()).unwrap();
        let archived = tmp.path().join("archive/brief_2025-06-01.md");
        assert_eq!(fs::read_to_string(archived).unwrap(), md);
    }

    #[test]
    fn archiving_without_a_brief_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        archive_brief(tmp.path(), now()).unwrap();
        assert!(!tmp.path().join("archive").exists());
    }
}
