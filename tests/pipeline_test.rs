//! End-to-end pipeline tests against a local HTTP server and both store
//! backends. The test source mirrors the real strategies: anchors on the
//! listing page are filtered by path shape, article pages are parsed with
//! the shared extraction helpers.

use chrono::NaiveDate;
use mockito::Matcher;
use scraper::{Html, Selector};
use url::Url;

use newsharvest::extract;
use newsharvest::models::Article;
use newsharvest::pipeline::{self, PipelineOptions};
use newsharvest::sources::Source;
use newsharvest::store::{ArticleStore, MemoryStore, SqliteStore};

struct TestSource {
    base: Url,
    sections: Vec<&'static str>,
}

impl TestSource {
    fn new(server_url: &str, section_paths: &[&str]) -> Self {
        let base = Url::parse(server_url).unwrap();
        let sections = section_paths
            .iter()
            .map(|p| Box::leak(format!("{server_url}{p}").into_boxed_str()) as &'static str)
            .collect();
        Self { base, sections }
    }
}

impl Source for TestSource {
    fn name(&self) -> &'static str {
        "testwire"
    }

    fn sections(&self) -> &[&str] {
        &self.sections
    }

    fn article_links(&self, listing_html: &str) -> Vec<String> {
        let document = Html::parse_document(listing_html);
        let anchor = Selector::parse("a[href]").unwrap();
        document
            .select(&anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.contains("/story/"))
            .filter_map(|href| {
                if href.starts_with('/') {
                    self.base.join(href).ok().map(|u| u.to_string())
                } else {
                    Some(href.to_string())
                }
            })
            .collect()
    }

    fn parse_article(&self, url: &str, html: &str) -> Option<Article> {
        let document = Html::parse_document(html);
        let title = extract::text_of_first(&document, "h1")
            .or_else(|| extract::meta_content(&document, r#"meta[property="og:title"]"#))?;
        let parts = extract::first_non_empty_paragraphs(&document, &["article p"]);
        if parts.is_empty() {
            return None;
        }
        let date = extract::time_tag_date(&document);
        let images = extract::collect_images(&document, "article", &self.base);
        Some(Article {
            url: url.to_string(),
            title,
            content: extract::join_paragraphs(&parts),
            date,
            images,
        })
    }
}

const ALPHA_PAGE: &str = concat!(
    "<html><body><article>",
    "<h1>Alpha Headline</h1>",
    r#"<time datetime="2024-01-01T10:00:00Z">1 January 2024</time>"#,
    "<p>First paragraph.</p>",
    "<p>Second paragraph.</p>",
    "<p>Third paragraph.</p>",
    "</article></body></html>",
);

const BETA_PAGE: &str = concat!(
    "<html><head>",
    r#"<meta property="og:title" content="Beta From Meta">"#,
    "</head><body><article>",
    "<p>Beta body.</p>",
    "</article></body></html>",
);

#[tokio::test]
async fn test_full_run_dedups_saves_and_is_idempotent() {
    let mut server = mockito::Server::new_async().await;

    // Three anchors: two to the same story behind different query strings,
    // one to a distinct story.
    let listing = concat!(
        r#"<a href="/story/alpha?ref=home">Alpha</a>"#,
        r#"<a href="/story/alpha?ref=sidebar">Alpha again</a>"#,
        r#"<a href="/story/beta">Beta</a>"#,
    );
    let _section = server
        .mock("GET", "/section")
        .with_status(200)
        .with_body(listing)
        .create_async()
        .await;
    let _alpha = server
        .mock("GET", "/story/alpha")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(ALPHA_PAGE)
        .create_async()
        .await;
    let _beta = server
        .mock("GET", "/story/beta")
        .with_status(200)
        .with_body(BETA_PAGE)
        .create_async()
        .await;

    let source = TestSource::new(&server.url(), &["/section"]);
    let store = MemoryStore::new();
    let opts = PipelineOptions::default();

    let summary = pipeline::run_source(&source, &store, &opts).await;
    assert_eq!(summary.found, 3);
    assert_eq!(summary.unique, 2);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(store.count().await.unwrap(), 2);

    let articles = store.articles().await;
    let alpha = articles
        .iter()
        .find(|a| a.title == "Alpha Headline")
        .unwrap();
    assert_eq!(
        alpha.content,
        "First paragraph.\nSecond paragraph.\nThird paragraph."
    );
    // 10:00 UTC converted to the fixed target zone (+08:00)
    assert_eq!(
        alpha.date.unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    );
    // Title recovered from og:title when no h1 exists
    assert!(articles.iter().any(|a| a.title == "Beta From Meta"));

    // Second run over unchanged pages: nothing new is stored.
    let rerun = pipeline::run_source(&source, &store, &opts).await;
    assert_eq!(rerun.found, 3);
    assert_eq!(rerun.unique, 2);
    assert_eq!(rerun.saved, 0);
    assert_eq!(rerun.duplicates, 2);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_incomplete_articles_are_discarded() {
    let mut server = mockito::Server::new_async().await;

    let listing = concat!(
        r#"<a href="/story/no-title">One</a>"#,
        r#"<a href="/story/no-body">Two</a>"#,
    );
    let _section = server
        .mock("GET", "/section")
        .with_status(200)
        .with_body(listing)
        .create_async()
        .await;
    let _no_title = server
        .mock("GET", "/story/no-title")
        .with_status(200)
        .with_body("<article><p>Body without any headline.</p></article>")
        .create_async()
        .await;
    let _no_body = server
        .mock("GET", "/story/no-body")
        .with_status(200)
        .with_body("<h1>Headline without body</h1>")
        .create_async()
        .await;

    let source = TestSource::new(&server.url(), &["/section"]);
    let store = MemoryStore::new();

    let summary = pipeline::run_source(&source, &store, &PipelineOptions::default()).await;
    assert_eq!(summary.unique, 2);
    assert_eq!(summary.discarded, 2);
    assert_eq!(summary.saved, 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failures_are_isolated_per_unit_of_work() {
    let mut server = mockito::Server::new_async().await;

    // One section 404s; the other lists a healthy story and a 500ing one.
    let _bad_section = server
        .mock("GET", "/broken-section")
        .with_status(404)
        .create_async()
        .await;
    let listing = concat!(
        r#"<a href="/story/good">Good</a>"#,
        r#"<a href="/story/flaky">Flaky</a>"#,
    );
    let _section = server
        .mock("GET", "/section")
        .with_status(200)
        .with_body(listing)
        .create_async()
        .await;
    let _good = server
        .mock("GET", "/story/good")
        .with_status(200)
        .with_body(ALPHA_PAGE)
        .create_async()
        .await;
    let _flaky = server
        .mock("GET", "/story/flaky")
        .with_status(500)
        .create_async()
        .await;

    let source = TestSource::new(&server.url(), &["/broken-section", "/section"]);
    let store = MemoryStore::new();

    let summary = pipeline::run_source(&source, &store, &PipelineOptions::default()).await;
    assert_eq!(summary.found, 2);
    assert_eq!(summary.unique, 2);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.saved, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_crawl_ends_run_early() {
    let mut server = mockito::Server::new_async().await;

    let _section = server
        .mock("GET", "/section")
        .with_status(200)
        .with_body("<a href=\"/about\">About us</a>")
        .create_async()
        .await;

    let source = TestSource::new(&server.url(), &["/section"]);
    let store = MemoryStore::new();

    let summary = pipeline::run_source(&source, &store, &PipelineOptions::default()).await;
    assert_eq!(summary.found, 0);
    assert_eq!(summary.unique, 0);
    assert_eq!(summary.saved, 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_full_run_against_sqlite_store() {
    let mut server = mockito::Server::new_async().await;

    let listing = concat!(
        r#"<a href="/story/alpha?ref=home">Alpha</a>"#,
        r#"<a href="/story/alpha?ref=sidebar">Alpha again</a>"#,
        r#"<a href="/story/beta">Beta</a>"#,
    );
    let _section = server
        .mock("GET", "/section")
        .with_status(200)
        .with_body(listing)
        .create_async()
        .await;
    let _alpha = server
        .mock("GET", "/story/alpha")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(ALPHA_PAGE)
        .create_async()
        .await;
    let _beta = server
        .mock("GET", "/story/beta")
        .with_status(200)
        .with_body(BETA_PAGE)
        .create_async()
        .await;

    let source = TestSource::new(&server.url(), &["/section"]);
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    let opts = PipelineOptions::default();

    let summary = pipeline::run_source(&source, &store, &opts).await;
    assert_eq!(summary.saved, 2);
    assert_eq!(store.count().await.unwrap(), 2);

    let rerun = pipeline::run_source(&source, &store, &opts).await;
    assert_eq!(rerun.saved, 0);
    assert_eq!(rerun.duplicates, 2);
    assert_eq!(store.count().await.unwrap(), 2);
}
