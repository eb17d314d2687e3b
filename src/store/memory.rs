use super::ArticleStore;
use crate::error::StoreError;
use crate::models::Article;
use crate::urls;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory store with the same upsert contract as the SQLite backend.
/// Used by tests and `--dry-run`; the write lock makes the check-and-insert
/// atomic across concurrent workers.
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored documents, in insertion order.
    pub async fn articles(&self) -> Vec<Article> {
        self.articles.read().await.clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert_if_absent(&self, article: &Article) -> Result<bool, StoreError> {
        let prefix = urls::canonicalize(&article.url);
        let mut articles = self.articles.write().await;
        if articles.iter().any(|a| a.url.starts_with(&prefix)) {
            return Ok(false);
        }
        articles.push(article.clone());
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.articles.read().await.len() as u64)
    }
}
