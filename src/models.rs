use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A fully extracted article, ready to be upserted into the store.
///
/// `url` is the candidate URL as discovered; the store derives the dedup
/// key from it via canonicalization. `date` is timezone-naive: zone-aware
/// timestamps are converted to the fixed target zone before the offset is
/// dropped. `images` carries absolute URLs only, already deduplicated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub content: String,
    pub date: Option<NaiveDateTime>,
    pub images: Vec<String>,
}

/// Per-source counters reported at the end of a run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub source: String,
    /// Candidate URLs collected across all section pages, duplicates included.
    pub found: usize,
    /// Candidates remaining after canonical-URL deduplication.
    pub unique: usize,
    pub fetch_failures: usize,
    /// Candidates dropped for missing title or content.
    pub discarded: usize,
    /// Upserts skipped because a matching document already existed.
    pub duplicates: usize,
    pub store_errors: usize,
    pub saved: usize,
}

impl RunSummary {
    pub fn accumulate(&mut self, other: &RunSummary) {
        self.found += other.found;
        self.unique += other.unique;
        self.fetch_failures += other.fetch_failures;
        self.discarded += other.discarded;
        self.duplicates += other.duplicates;
        self.store_errors += other.store_errors;
        self.saved += other.saved;
    }
}
