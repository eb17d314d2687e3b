//! Crawl, extract, and ingest news articles from multiple outlets.
//!
//! The pipeline runs as a finite batch in two phases per source:
//!
//! 1. **Crawl**: fetch each section (listing) page and collect candidate
//!    article URLs with source-specific rules
//! 2. **Extract**: fetch each unique candidate, parse title/content/date/
//!    images, and upsert the document into the article store
//!
//! Candidates are deduplicated by canonical URL (query string and fragment
//! stripped) in a single-threaded aggregation step between the phases.
//! Failures are isolated per unit of work; a bad page never aborts a run.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod store;
pub mod urls;
