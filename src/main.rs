//! Daily Briefer — Binary Entrypoint
//! Runs the full pipeline once: fetch feeds, cluster into events, rank,
//! render the Markdown and HTML briefs, archive.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daily_briefer::brief::{archive_brief, render_brief, write_brief};
use daily_briefer::brief_html::{render_html_brief, write_html_brief};
use daily_briefer::cluster::cluster_items;
use daily_briefer::config::Settings;
use daily_briefer::ingest::providers::RssFeedProvider;
use daily_briefer::ingest::types::FeedProvider;
use daily_briefer::ingest::{feeds, run_once};
use daily_briefer::rank::select_top_events;
use daily_briefer::sources::SourceDirectory;
use daily_briefer::title::select_canonical_title;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daily_briefer=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let now = Utc::now();
    info!("daily briefer starting");

    // 1) Configuration
    let settings = Settings::load_default()?;
    let sources = feeds::load_feeds_default()?;
    if sources.is_empty() {
        warn!("no feeds configured, the brief will be empty");
    }
    let directory = SourceDirectory::new(&sources, &settings.sources);

    // 2) Ingest: fetch, dedup, lookback window
    let providers: Vec<Box<dyn FeedProvider>> = sources
        .iter()
        .map(|s| Box::new(RssFeedProvider::from_source(s.clone())) as Box<dyn FeedProvider>)
        .collect();
    let items = run_once(&providers, now, settings.lookback_hours).await;
    info!(items = items.len(), "items ready for clustering");

    // 3) Cluster into events
    let mut events = cluster_items(&items, &settings.clustering, &directory);

    // 4) Canonical titles
    for event in events.iter_mut() {
        event.canonical_title = select_canonical_title(event, &directory)?;
    }

    // 5) Rank and truncate
    let top_events = select_top_events(events, &settings.ranking, &directory, now);

    // 6) Render and archive
    let markdown = render_brief(
        &top_events,
        &sources,
        &directory,
        settings.max_sources_per_event,
        now,
    );
    write_brief(&markdown, &settings.output_dir)?;
    let html = render_html_brief(
        &top_events,
        &sources,
        &directory,
        settings.max_sources_per_event,
        now,
    );
    write_html_brief(&html, &settings.output_dir)?;
    archive_brief(&settings.output_dir, now)?;

    info!(events = top_events.len(), "daily briefer finished");
    Ok(())
}
