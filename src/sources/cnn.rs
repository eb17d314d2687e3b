use super::Source;
use crate::extract;
use crate::models::Article;
use crate::urls;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// CNN tags article anchors with `data-link-type="article"` on its section
/// pages. Article bodies use `paragraph`-classed `<p>` elements, and the
/// visible timestamp carries an "Updated" prefix.
pub struct Cnn;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://edition.cnn.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://edition.cnn.com/",
    "https://edition.cnn.com/world",
    "https://edition.cnn.com/politics",
    "https://edition.cnn.com/business",
    "https://edition.cnn.com/health",
    "https://edition.cnn.com/entertainment",
    "https://edition.cnn.com/style",
    "https://edition.cnn.com/travel",
    "https://edition.cnn.com/science",
    "https://edition.cnn.com/climate",
    "https://edition.cnn.com/weather",
];

static ARTICLE_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[data-link-type="article"][href]"#).unwrap());

impl Source for Cnn {
    fn name(&self) -> &'static str {
        "cnn"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        document
            .select(&ARTICLE_ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| urls::resolve(&BASE, href))
            .collect()
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        // --- TITLE: h1#maincontent, og:title fallback ---
        let title = extract::text_of_first(&document, "h1#maincontent")
            .or_else(|| extract::meta_content(&document, r#"meta[property="og:title"]"#))?;

        // --- CONTENT ---
        let parts = extract::first_non_empty_paragraphs(
            &document,
            &[r#"p[class*="paragraph"]"#, "article p", "main p"],
        );
        if parts.is_empty() {
            return None;
        }

        // --- DATE: visible timestamp, "Updated" stripped ---
        let date = extract::visible_date(&document, r#"div[class*="timestamp"]"#)
            .or_else(|| extract::published_at(&document));

        // --- IMAGES ---
        let mut images = extract::collect_images(&document, "main", &BASE);
        if images.is_empty() {
            images = extract::collect_images(&document, "", &BASE);
        }

        Some(Article {
            url: url.to_string(),
            title,
            content: extract::join_paragraphs(&parts),
            date,
            images,
        })
    }
}
