use super::Source;
use crate::extract;
use crate::models::Article;
use crate::urls;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Al Jazeera. Listing pages link articles with site-relative hrefs under a
/// handful of verticals; article bodies live in `div.wysiwyg`.
pub struct AlJazeera;

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.aljazeera.com").unwrap());

const SECTION_URLS: &[&str] = &[
    "https://www.aljazeera.com/",
    "https://www.aljazeera.com/news/",
    "https://www.aljazeera.com/sports/",
    "https://www.aljazeera.com/opinions/",
    "https://www.aljazeera.com/features/",
    "https://www.aljazeera.com/economy/",
    "https://www.aljazeera.com/climate-crisis",
    "https://www.aljazeera.com/investigations/",
    "https://www.aljazeera.com/tag/human-rights/",
    "https://www.aljazeera.com/tag/science-and-technology/",
];

const ARTICLE_PATH_PREFIXES: &[&str] = &["/news/", "/sports/", "/opinions/"];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

impl Source for AlJazeera {
    fn name(&self) -> &'static str {
        "aljazeera"
    }

    fn sections(&self) -> &[&str] {
        SECTION_URLS
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        let mut out = Vec::new();
        for a in document.select(&ANCHOR) {
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            if !ARTICLE_PATH_PREFIXES.iter().any(|p| href.starts_with(p)) {
                continue;
            }
            if let Some(url) = urls::resolve(&BASE, href) {
                out.push(url);
            }
        }
        out
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);

        let title = extract::text_of_first(&document, "h1")?;

        let parts = extract::first_non_empty_paragraphs(
            &document,
            &["div.wysiwyg p", "article p", "main p"],
        );
        if parts.is_empty() {
            return None;
        }

        // "Published On 18 Oct 2025" style visible dates
        let date = extract::visible_date(&document, "div.article-dates div.date-simple span")
            .or_else(|| extract::published_at(&document));

        let images = extract::collect_images(&document, "figure", &BASE);

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
    fn test_article_links_filter_by_vertical() {
        let html = concat!(
            r#"<a href="/news/2025/10/18/some-story">Story</a>"#,
            r#"<a href="/sports/2025/10/18/match-report">Match</a>"#,
            r#"<a href="/videos/2025/10/18/clip">Video</a>"#,
            r#"<a href="/where/gaza">Topic</a>"#,
        );
        let links = AlJazeera.article_links(html);
        assert_eq!(
            links,
            vec![
                "https://www.aljazeera.com/news/2025/10/18/some-story".to_string(),
                "https://www.aljazeera.com/sports/2025/10/18/match-report".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_article_with_published_on_date() {
        let html = concat!(
            "<h1>Headline</h1>",
            r#"<div class="article-dates"><div class="date-simple">"#,
            "<span>Published On 18 Oct 2025</span>",
            "</div></div>",
            r#"<div class="wysiwyg"><p>Paragraph one.</p><p>Paragraph two.</p></div>"#,
        );
        let article = AlJazeera
            .parse_article("https://www.aljazeera.com/news/2025/10/18/some-story", html)
            .unwrap();
        assert_eq!(article.title, "Headline");
        assert_eq!(article.content, "Paragraph one.\nParagraph two.");
        assert_eq!(
            article.date.unwrap().date(),
            NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
        );
    }

    #[test]
    fn test_figure_images_absolutized() {
        let html = concat!(
            "<h1>T</h1>",
            r#"<figure><img src="/wp-content/uploads/story.jpg"></figure>"#,
            r#"<div class="wysiwyg"><p>Body.</p></div>"#,
        );
        let article = AlJazeera
            .parse_article("https://www.aljazeera.com/news/x", html)
            .unwrap();
        assert_eq!(
            article.images,
            vec!["https://www.aljazeera.com/wp-content/uploads/story.jpg".to_string()]
        );
    }
}
