//! Per-outlet scraping strategies behind one extraction contract.
//!
//! Every source answers the same two questions (which article URLs does a
//! listing page link to, and what does an article page contain) with its
//! own selectors and href rules. Parsing is synchronous over already
//! fetched HTML, so each strategy is unit-testable on fixture documents;
//! all network traffic lives in the pipeline.

use crate::models::Article;

pub mod aljazeera;
pub mod apnews;
pub mod bbc;
pub mod cnn;
pub mod guardian;
pub mod skynews;

pub trait Source: Send + Sync {
    /// Registry key, also recorded in run summaries.
    fn name(&self) -> &'static str;

    /// Section (listing) pages to crawl.
    fn sections(&self) -> &[&str];

    /// Candidate article URLs found on one listing page. Absolute,
    /// possibly duplicated across sections; never fails, an unparseable
    /// page yields an empty list.
    fn article_links(&self, listing_html: &str) -> Vec<String>;

    /// Parse a fetched article page. None when the page has no title or no
    /// body content; such candidates are dropped, not persisted.
    fn parse_article(&self, url: &str, html: &str) -> Option<Article>;
}

/// All registered sources, in the order they run by default.
pub fn all() -> &'static [&'static dyn Source] {
    static SOURCES: &[&dyn Source] = &[
        &bbc::Bbc,
        &cnn::Cnn,
        &apnews::ApNews,
        &aljazeera::AlJazeera,
        &guardian::Guardian,
        &skynews::SkyNews,
    ];
    SOURCES
}

pub fn by_name(name: &str) -> Option<&'static dyn Source> {
    all().iter().copied().find(|s| s.name() == name)
}
