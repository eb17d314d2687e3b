use super::Source;
use crate::extract;
use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// AP News. Article links are recognized by URL shape rather than markup;
/// publish times come from a `bsp-timestamp` custom element carrying a
/// millisecond epoch; image URLs are often wrapped in a `dims.apnews.com`
/// resizing proxy with the original URL percent-encoded in a `url=` query
/// parameter.
pub struct ApNews;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://apnews.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://apnews.com/",
    "https://apnews.com/world-news",
    "https://apnews.com/us-news",
    "https://apnews.com/politics",
    "https://apnews.com/sports",
    "https://apnews.com/entertainment",
    "https://apnews.com/business",
    "https://apnews.com/science",
    "https://apnews.com/health",
    "https://apnews.com/technology",
    "https://apnews.com/lifestyle",
    "https://apnews.com/climate-and-environment",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ARTICLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://apnews\.com/article/[\w-]+$").unwrap());
static DIMS_INNER_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"url=([^&]+)").unwrap());

const BODY_SELECTORS: &[&str] = &[
    r#"div[class*="RichTextStoryBody"] p"#,
    r#"div[class*="article-body"] p"#,
];

/// Recover the original image URL from a dims.apnews.com proxy link.
fn unwrap_dims(raw: &str) -> Option<String> {
    if !raw.contains("dims.apnews.com") || !raw.contains("url=") {
        return None;
    }
    let inner = DIMS_INNER_URL.captures(raw)?.get(1)?.as_str();
    let decoded = urlencoding::decode(inner).ok()?.into_owned();
    (decoded.starts_with("http://") || decoded.starts_with("https://")).then_some(decoded)
}

fn push_ap_image(raw: &str, out: &mut BTreeSet<String>) {
    let candidate = match unwrap_dims(raw) {
        Some(original) => original,
        // Plain URLs keep only the path part; fragments and resize params go
        None => raw.split(['?', '#']).next().unwrap_or(raw).to_string(),
    };
    extract::push_image(&candidate, &BASE, out);
}

/// Boilerplate lines the story body mixes into its paragraphs.
fn is_boilerplate(text: &str) -> bool {
    text.starts_with("Copyright") || text.starts_with("AP ") || text.split_whitespace().count() <= 5
}

impl Source for ApNews {
    fn name(&self) -> &'static str {
        "apnews"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        document
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| ARTICLE_URL.is_match(href))
            .map(|href| href.to_string())
            .collect()
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        // --- TITLE ---
        let title = extract::text_of_first(&document, "h1")?;

        // --- CONTENT, boilerplate filtered ---
        let parts: Vec<String> = extract::first_non_empty_paragraphs(&document, BODY_SELECTORS)
            .into_iter()
            .filter(|p| !is_boilerplate(p))
            .collect();
        if parts.is_empty() {
            return None;
        }

        // --- DATE: epoch attribute first, visible text fallback ---
        let date = extract::attr_of_first(&document, "bsp-timestamp[data-timestamp]", "data-timestamp")
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(extract::epoch_millis_date)
            .or_else(|| extract::visible_date(&document, "span[data-date]"))
            .or_else(|| extract::published_at(&document));

        // --- IMAGES: lead image from meta tags, then the story body ---
        let mut images = BTreeSet::new();
        for css in [
            r#"meta[property="og:image"]"#,
            r#"meta[name="twitter:image"]"#,
            r#"meta[property="twitter:image"]"#,
        ] {
            if let Some(content) = extract::meta_content(&document, css) {
                push_ap_image(&content, &mut images);
            }
        }
        for css in [
            r#"div[class*="RichTextStoryBody"] img[src]"#,
            r#"div[class*="RichTextStoryBody"] picture source[srcset]"#,
        ] {
            if let Ok(sel) = Selector::parse(css) {
                for el in document.select(&sel) {
                    if let Some(src) = el.value().attr("src") {
                        push_ap_image(src, &mut images);
                    }
                    if let Some(srcset) = el.value().attr("srcset") {
                        for candidate in extract::srcset_urls(srcset) {
                            push_ap_image(candidate, &mut images);
                        }
                    }
                }
            }
        }

        Some(Article {
            url: url.to_string(),
            title,
            content: extract::join_paragraphs(&parts),
            date,
            images: images.into_iter().collect(),
        })
    }
}
