use crate::error::FetchError;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
            "AppleWebKit/537.36 (KHTML, like Gecko) ",
            "Chrome/123.0.0.0 Safari/537.36"
        ))
        .timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("failed to build reqwest client")
});

/// GET a page and return its body. One attempt, no retry; the only bound on
/// a slow server is the client's fixed request timeout.
pub async fn fetch_page(url: &str) -> Result<String, FetchError> {
    let res = CLIENT.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = res.text().await?;
    debug!(%url, bytes = body.len(), "Fetched page");
    Ok(body)
}
