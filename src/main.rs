//! # newsharvest
//!
//! A batch news-ingestion pipeline that crawls section pages of several
//! outlets, extracts articles (title, body, publish date, images), and
//! upserts them into a document store keyed by canonical URL.
//!
//! ## Usage
//!
//! ```sh
//! DATABASE_URL=sqlite://news.db newsharvest
//! newsharvest -s bbc -s guardian --dry-run
//! ```
//!
//! ## Architecture
//!
//! Each source runs two sequential phases:
//! 1. **Crawl**: fetch section pages concurrently, collect candidate URLs
//! 2. **Extract**: fetch unique candidates concurrently, parse, upsert
//!
//! Candidates are deduplicated by canonical URL between the phases. A run
//! is finite: it terminates once all work items complete and reports
//! found/unique/saved counts.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newsharvest::cli::Cli;
use newsharvest::config::Config;
use newsharvest::models::RunSummary;
use newsharvest::pipeline::{self, PipelineOptions};
use newsharvest::sources::{self, Source};
use newsharvest::store::{ArticleStore, MemoryStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsharvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Resolve the sources to run
    let selected: Vec<&'static dyn Source> = if args.source.is_empty() {
        sources::all().to_vec()
    } else {
        let mut selected = Vec::new();
        for name in &args.source {
            match sources::by_name(name) {
                Some(source) => selected.push(source),
                None => {
                    let known = sources::all()
                        .iter()
                        .map(|s| s.name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(format!("unknown source '{name}' (known: {known})").into());
                }
            }
        }
        selected
    };

    // The store connection is established eagerly; failure here is fatal.
    let store: Box<dyn ArticleStore> = if args.dry_run {
        info!("Dry run: in-memory store, nothing will be persisted");
        Box::new(MemoryStore::new())
    } else {
        let config = Config::from_env(args.database_url.as_deref())?;
        Box::new(SqliteStore::connect(&config.database_url).await?)
    };

    let opts = PipelineOptions {
        crawl_concurrency: args.crawl_concurrency,
        fetch_concurrency: args.fetch_concurrency,
    };

    let mut totals = RunSummary::default();
    for source in selected {
        let summary = pipeline::run_source(source, store.as_ref(), &opts).await;
        info!(
            source = %summary.source,
            found = summary.found,
            unique = summary.unique,
            saved = summary.saved,
            duplicates = summary.duplicates,
            discarded = summary.discarded,
            fetch_failures = summary.fetch_failures,
            "Source finished"
        );
        totals.accumulate(&summary);
    }

    if totals.saved == 0 {
        warn!("No new articles saved this run");
    }

    let stored = store.count().await?;
    info!(
        found = totals.found,
        unique = totals.unique,
        saved = totals.saved,
        stored,
        "Run complete"
    );

    let elapsed = start_time.elapsed();
    info!(
        "Execution time: {:.2?} ({}.{:03} seconds)",
        elapsed,
        elapsed.as_secs(),
        elapsed.subsec_millis()
    );

    Ok(())
}
