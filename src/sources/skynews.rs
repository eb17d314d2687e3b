use super::Source;
use crate::extract;
use crate::models::Article;
use crate::urls;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Sky News. Every article lives under `/story/`; visible dates end in a
/// ", UK" suffix that the fuzzy parser strips.
pub struct SkyNews;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://news.sky.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://news.sky.com/",
    "https://news.sky.com/us",
    "https://news.sky.com/uk",
    "https://news.sky.com/world",
    "https://news.sky.com/money",
    "https://news.sky.com/science-climate-tech",
    "https://news.sky.com/entertainment",
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static STORY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https://news\.sky\.com)?/story/").unwrap());

impl Source for SkyNews {
    fn name(&self) -> &'static str {
        "skynews"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        document
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| STORY_PATH.is_match(href))
            .filter_map(|href| urls::resolve(&BASE, href))
            .collect()
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        let title = extract::text_of_first(&document, "h1")
            .or_else(|| extract::meta_content(&document, r#"meta[property="og:title"]"#))?;

        let parts = extract::first_non_empty_paragraphs(
            &document,
            &[
                r#"[itemprop="articleBody"] p"#,
                "div.sdc-article-body p",
                "article p",
            ],
        );
        if parts.is_empty() {
            return None;
        }

        let date = extract::time_tag_date(&document)
            .or_else(|| extract::visible_date(&document, r#"[class*="article-header"]"#))
            .or_else(|| extract::published_at(&document));

        let mut images = extract::collect_images(&document, r#"[itemprop="articleBody"]"#, &BASE);
        if images.is_empty() {
            images = extract::collect_images(&document, "article", &BASE);
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_article_links_match_story_paths() {
        let html = concat!(
            r#"<a href="/story/some-headline-13360000">Relative</a>"#,
            r#"<a href="https://news.sky.com/story/other-headline-13360001">Absolute</a>"#,
            r#"<a href="/topic/climate-change">Topic</a>"#,
        );
        let links = SkyNews.article_links(html);
        assert_eq!(
            links,
            vec![
                "https://news.sky.com/story/some-headline-13360000".to_string(),
                "https://news.sky.com/story/other-headline-13360001".to_string(),
            ]
        );
    }

    #[test]
    fn test_uk_suffix_date_parsed() {
        let html = concat!(
            "<h1>Headline</h1>",
            r#"<div class="sdc-article-header article-header">Sunday 4 May 2025 04:38, UK</div>"#,
            r#"<div itemprop="articleBody"><p>Body paragraph.</p></div>"#,
        );
        let article = SkyNews
            .parse_article("https://news.sky.com/story/x-13360000", html)
            .unwrap();
        assert_eq!(
            article.date.unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 4)
                .unwrap()
                .and_hms_opt(4, 38, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_time_datetime_preferred_over_header_text() {
        let html = concat!(
            "<h1>Headline</h1>",
            r#"<time datetime="2025-05-04T02:00:00Z">Sunday 4 May 2025</time>"#,
            r#"<div class="article-header">Sunday 4 May 2025 04:38, UK</div>"#,
            r#"<div itemprop="articleBody"><p>Body paragraph.</p></div>"#,
        );
        let article = SkyNews
            .parse_article("https://news.sky.com/story/x-13360000", html)
            .unwrap();
        // 02:00 UTC is 10:00 in the target zone
        assert_eq!(
            article.date.unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 4)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_og_title_fallback() {
        let html = concat!(
            r#"<head><meta property="og:title" content="Sky Meta Title"></head>"#,
            r#"<body><div class="sdc-article-body"><p>Body.</p></div></body>"#,
        );
        let article = SkyNews
            .parse_article("https://news.sky.com/story/x-13360000", html)
            .unwrap();
        assert_eq!(article.title, "Sky Meta Title");
    }
}
