use super::Source;
use crate::extract;
use crate::models::Article;
use crate::urls;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// BBC listing pages wrap article headlines in `<h3>` or `<h2>` inside the
/// anchor; anchors without a headline are navigation chrome.
pub struct Bbc;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.bbc.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://www.bbc.com/news",
    "https://www.bbc.com/business",
    "https://www.bbc.com/innovation",
    "https://www.bbc.com/culture",
    "https://www.bbc.com/arts",
    "https://www.bbc.com/travel",
    "https://www.bbc.com/future-planet",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h3, h2").unwrap());

impl Source for Bbc {
    fn name(&self) -> &'static str {
        "bbc"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        let mut out = Vec::new();
        for a in document.select(&ANCHOR) {
            if a.select(&HEADLINE).next().is_none() {
                continue;
            }
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            if let Some(url) = urls::resolve(&BASE, href) {
                out.push(url);
            }
        }
        out
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        // --- TITLE ---
        let title = extract::text_of_first(&document, "h1")?;

        // --- CONTENT ---
        let parts = extract::first_non_empty_paragraphs(&document, &["article p"]);
        if parts.is_empty() {
            return None;
        }

        // --- DATE ---
        let date = extract::published_at(&document);

        // --- IMAGES ---
        let images = extract::collect_images(&document, "article", &BASE);

        Some(Article {
            url: url.to_string(),
            title,
            content: extract::join_paragraphs(&parts),
            date,
            images,
        })
    }
}
