//! Two-phase batch orchestration for one source: crawl the section pages,
//! deduplicate candidates by canonical URL, then fetch/extract/upsert each
//! unique candidate. Both phases run on their own bounded worker pool; the
//! deduplication happens in the single-threaded aggregation step between
//! them, so no shared "seen" set (and no lock) exists.

use crate::http;
use crate::models::RunSummary;
use crate::sources::Source;
use crate::store::ArticleStore;
use crate::urls;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Worker-pool width for section (listing) pages.
    pub crawl_concurrency: usize,
    /// Worker-pool width for article pages; larger because the article
    /// phase carries most of the per-page workload.
    pub fetch_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            crawl_concurrency: 3,
            fetch_concurrency: 5,
        }
    }
}

enum Outcome {
    Saved,
    Duplicate,
    Discarded,
    FetchFailed,
    StoreFailed,
}

/// Run the full crawl-and-ingest batch for one source. Failures are
/// isolated per unit of work and tallied; this function itself never
/// fails. The run ends early (with a warning) only when the crawl phase
/// finds no candidates across every seed.
#[instrument(level = "info", skip_all, fields(source = source.name()))]
pub async fn run_source(
    source: &dyn Source,
    store: &dyn ArticleStore,
    opts: &PipelineOptions,
) -> RunSummary {
    let mut summary = RunSummary {
        source: source.name().to_string(),
        ..Default::default()
    };

    // Phase 1: gather candidate URLs from every section page.
    let candidates: Vec<String> = stream::iter(source.sections().iter().copied())
        .map(|section| async move {
            match http::fetch_page(section).await {
                Ok(html) => {
                    let links = source.article_links(&html);
                    info!(section, count = links.len(), "Crawled section");
                    links
                }
                Err(e) => {
                    error!(error = %e, section, "Section crawl failed");
                    Vec::new()
                }
            }
        })
        .buffer_unordered(opts.crawl_concurrency)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect();

    summary.found = candidates.len();
    if candidates.is_empty() {
        warn!("No candidates found across any seed; ending run early");
        return summary;
    }

    // Aggregation barrier: deduplicate by canonical URL before phase 2.
    let unique: Vec<String> = candidates
        .into_iter()
        .unique_by(|u| urls::canonicalize(u))
        .collect();
    summary.unique = unique.len();
    info!(
        found = summary.found,
        unique = summary.unique,
        "Candidates gathered"
    );

    // Phase 2: fetch, extract, and upsert each unique candidate.
    let outcomes: Vec<Outcome> = stream::iter(unique)
        .map(|url| async move {
            let html = match http::fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    error!(error = %e, %url, "Article fetch failed");
                    return Outcome::FetchFailed;
                }
            };
            let Some(article) = source.parse_article(&url, &html) else {
                warn!(%url, "Skipping (no title/content)");
                return Outcome::Discarded;
            };
            match store.insert_if_absent(&article).await {
                Ok(true) => {
                    info!(%url, title = %article.title, "Saved article");
                    Outcome::Saved
                }
                Ok(false) => {
                    debug!(%url, "Already stored; skipped");
                    Outcome::Duplicate
                }
                Err(e) => {
                    error!(error = %e, %url, "Store write failed");
                    Outcome::StoreFailed
                }
            }
        })
        .buffer_unordered(opts.fetch_concurrency)
        .collect()
        .await;

    for outcome in outcomes {
        match outcome {
            Outcome::Saved => summary.saved += 1,
            Outcome::Duplicate => summary.duplicates += 1,
            Outcome::Discarded => summary.discarded += 1,
            Outcome::FetchFailed => summary.fetch_failures += 1,
            Outcome::StoreFailed => summary.store_errors += 1,
        }
    }

    info!(
        saved = summary.saved,
        duplicates = summary.duplicates,
        discarded = summary.discarded,
        fetch_failures = summary.fetch_failures,
        "Source run complete"
    );
    summary
}
