use super::Source;
use crate::extract;
use crate::models::Article;
use crate::urls;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// The Guardian. Article paths embed a date (`/world/2025/may/06/slug`),
/// which is the most stable listing-page signal the site offers; body
/// markup uses generated `dcr-` class names, so content extraction keys on
/// the article-body container instead.
pub struct Guardian;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.theguardian.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://www.theguardian.com/international",
    "https://www.theguardian.com/world",
    "https://www.theguardian.com/us-news",
    "https://www.theguardian.com/uk-news",
    "https://www.theguardian.com/environment",
    "https://www.theguardian.com/science",
    "https://www.theguardian.com/global-development",
    "https://www.theguardian.com/technology",
    "https://www.theguardian.com/business",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static DATED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[a-z-]+/\d{4}/[a-z]{3}/\d{2}/").unwrap());

impl Source for Guardian {
    fn name(&self) -> &'static str {
        "guardian"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        document
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| DATED_PATH.is_match(href))
            .filter_map(|href| urls::resolve(&BASE, href))
            .collect()
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        let title = extract::text_of_first(&document, "h1")?;

        let parts = extract::first_non_empty_paragraphs(
            &document,
            &[
                r#"div[class*="article-body"] p"#,
                "#maincontent p",
                "article p",
            ],
        );
        if parts.is_empty() {
            return None;
        }

        let date = extract::meta_date(&document)
            .or_else(|| extract::visible_date(&document, r#"span[class*="dcr-"]"#))
            .or_else(|| extract::published_at(&document));

        // Lead image from og:image, inline images from picture sources
        let mut images = extract::collect_images(&document, "article", &BASE);
        if let Some(lead) = extract::meta_content(&document, r#"meta[property="og:image"]"#) {
            if !extract::is_denylisted(&lead) && !images.contains(&lead) {
                images.push(lead);
                images.sort();
            }
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
