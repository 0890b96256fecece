// src/brief_html.rs
//! HTML rendering of the morning brief: styled event cards split into a
//! general-news section and a finance section via the majority-vote
//! categorization.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::cluster::categorize_events;
use crate::model::{Event, Source, Tier};
use crate::sources::SourceDirectory;

const STYLESHEET: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
:root {
  --color-bg: #f5f7fa; --color-surface: #ffffff;
  --color-primary: #2c3e50; --color-secondary: #7f8c8d;
  --color-accent: #3498db; --color-border: #e1e8ed;
}
body {
  font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
  background: var(--color-bg); color: var(--color-primary);
  line-height: 1.6; padding: 20px;
}
.container { max-width: 900px; margin: 0 auto; }
.header {
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
  color: white; padding: 40px 30px; border-radius: 16px; margin-bottom: 30px;
}
.header h1 { font-size: 2.5rem; margin-bottom: 8px; }
.header-meta { font-size: 1rem; opacity: 0.95; margin-top: 12px; }
.section-header {
  display: flex; justify-content: space-between; align-items: center;
  margin: 40px 0 20px 0; padding-bottom: 12px;
  border-bottom: 3px solid var(--color-accent);
}
.section-title { font-size: 1.8rem; }
.section-count { color: var(--color-secondary); }
.events-container { display: flex; flex-direction: column; gap: 20px; }
.event-card {
  background: var(--color-surface); border-radius: 12px; padding: 24px;
  border: 1px solid var(--color-border);
}
.event-header { display: flex; justify-content: space-between; margin-bottom: 12px; }
.event-number { font-weight: 600; color: var(--color-accent); }
.event-score { font-size: 0.85rem; color: var(--color-secondary); }
.event-title { font-size: 1.4rem; margin-bottom: 12px; }
.event-meta { display: flex; gap: 16px; margin-bottom: 16px; font-size: 0.9rem; color: var(--color-secondary); }
.event-sources { display: flex; flex-wrap: wrap; gap: 10px; align-items: center; }
.source-link { text-decoration: none; }
.source-badge {
  display: inline-block; padding: 6px 14px; border-radius: 20px;
  font-size: 0.85rem; color: white;
}
.badge-wire { background: #27ae60; }
.badge-news { background: #3498db; }
.badge-magazine { background: #9b59b6; }
.more-sources {
  padding: 6px 14px; background: var(--color-border);
  color: var(--color-secondary); border-radius: 20px; font-size: 0.85rem;
}
.no-events { text-align: center; padding: 60px 20px; color: var(--color-secondary); }
.footer {
  margin-top: 40px; padding: 30px; background: var(--color-surface);
  border-radius: 12px; text-align: center; border: 1px solid var(--color-border);
}
.footer-stats { display: flex; justify-content: center; gap: 40px; }
.stat-value { font-size: 2rem; font-weight: 700; color: var(--color-accent); display: block; }
.stat-label { font-size: 0.9rem; color: var(--color-secondary); text-transform: uppercase; }
"#;

fn tier_badge_class(tier: Tier) -> &'static str {
    match tier {
        Tier::Wire => "badge-wire",
        Tier::News => "badge-news",
        Tier::Magazine => "badge-magazine",
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Render one event as a card: numbered header with score, escaped
/// headline, and badge links per source (wire first, capped).
fn render_event_card(
    event: &Event,
    names: &HashMap<&str, &str>,
    directory: &SourceDirectory,
    max_sources: usize,
    index: usize,
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

    let mut sources_html = display
        .iter()
        .map(|it| {
            let name = names
                .get(it.source_id.as_str())
                .copied()
                .unwrap_or(it.source_id.as_str());
            let badge = tier_badge_class(directory.tier_of(&it.source_id));
            format!(
                "<a href=\"{}\" target=\"_blank\" class=\"source-link\" rel=\"noopener noreferrer\">\
                 <span class=\"source-badge {}\">{}</span></a>",
                html_escape::encode_double_quoted_attribute(&it.link),
                badge,
                html_escape::encode_text(name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    if remaining > 0 {
        sources_html.push_str(&format!(
            "<span class=\"more-sources\">+{remaining} more</span>"
        ));
    }

    let score_display = if event.score > 0.0 {
        format!("{:.1}", event.score)
    } else {
        "—".to_string()
    };

    format!(
        r#"<div class="event-card">
  <div class="event-header">
    <span class="event-number">#{index}</span>
    <span class="event-score">Score: {score_display}</span>
  </div>
  <h2 class="event-title">{title}</h2>
  <div class="event-meta">
    <span class="source-count">{sources}</span>
    <span class="article-count">{articles}</span>
  </div>
  <div class="event-sources">
{sources_html}
  </div>
</div>"#,
        title = html_escape::encode_text(&event.canonical_title),
        sources = plural(event.source_count(), "source"),
        articles = plural(event.items.len(), "article"),
    )
}

fn render_section(
    title: &str,
    empty_note: &str,
    events: &[Event],
    names: &HashMap<&str, &str>,
    directory: &SourceDirectory,
    max_sources: usize,
) -> String {
    let content = if events.is_empty() {
        format!("<div class=\"no-events\">{empty_note}</div>")
    } else {
        events
            .iter()
            .enumerate()
            .map(|(i, e)| render_event_card(e, names, directory, max_sources, i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<div class="section-header">
  <h2 class="section-title">{title}</h2>
  <span class="section-count">{count}</span>
</div>
<div class="events-container">
{content}
</div>"#,
        count = plural(events.len(), "event"),
    )
}

/// Render the complete brief as a standalone HTML page. Events are
/// expected to arrive already ranked and truncated; they are split into
/// general and financial sections by majority vote over their members.
pub fn render_html_brief(
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

    let (general, financial) = categorize_events(events.to_vec(), directory);

    let general_section = render_section(
        "General World News",
        "No general news events today.",
        &general,
        &names,
        directory,
        max_sources_per_event,
    );
    let financial_section = render_section(
        "Finance &amp; Economics",
        "No financial news events today.",
        &financial,
        &names,
        directory,
        max_sources_per_event,
    );

    let total_items: usize = events.iter().map(|e| e.items.len()).sum();
    let total_sources: usize = events.iter().map(|e| e.source_count()).sum();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Morning Brief — {date}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>Morning Brief</h1>
    <div>{date}</div>
    <div class="header-meta">Generated at {time} · {events_label}</div>
  </div>
{general_section}
{financial_section}
  <div class="footer">
    <div class="footer-stats">
      <div class="stat"><span class="stat-value">{event_count}</span><span class="stat-label">Events</span></div>
      <div class="stat"><span class="stat-value">{total_items}</span><span class="stat-label">Articles</span></div>
      <div class="stat"><span class="stat-value">{total_sources}</span><span class="stat-label">Source Mentions</span></div>
    </div>
  </div>
</div>
</body>
</html>
"#,
        date = now.format("%B %d, %Y"),
        time = now.format("%H:%M"),
        events_label = plural(events.len(), "top event"),
        event_count = events.len(),
        style = STYLESHEET,
    )
}

/// Write the rendered HTML brief to `<output_dir>/brief.html`.
pub fn write_html_brief(html: &str, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;
    let path = output_dir.join("brief.html");
    fs::write(&path, html)
        .with_context(|| format!("writing html brief to {}", path.display()))?;
    info!(path = %path.display(), "html brief written");
    Ok(path)
}
