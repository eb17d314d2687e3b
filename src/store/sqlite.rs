use super::ArticleStore;
use crate::error::StoreError;
use crate::models::Article;
use crate::urls;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// SQLite-backed article store. The connection is established eagerly at
/// startup; a store that cannot be reached is a fatal startup error rather
/// than something the pipeline retries around.
pub struct SqliteStore {
    pool: SqlitePool,
}

const CREATE_ARTICLES: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    published_at TIMESTAMP,
    images TEXT NOT NULL DEFAULT '[]',
    first_seen_at TIMESTAMP NOT NULL
)
"#;

const CREATE_URL_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_articles_url ON articles (url)";

/// Escape LIKE wildcards so a canonical prefix matches literally.
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // SQLite serializes writers anyway, and in-memory databases are
        // per-connection, so the pool stays at one connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_ARTICLES).execute(&pool).await?;
        sqlx::query(CREATE_URL_INDEX).execute(&pool).await?;
        info!(%database_url, "Connected to article store");

        Ok(Self { pool })
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn insert_if_absent(&self, article: &Article) -> Result<bool, StoreError> {
        let prefix = urls::canonicalize(&article.url);
        let like = format!("{}%", escape_like(&prefix));
        let images = serde_json::to_string(&article.images)?;

        // Single statement: the existence check and the insert are atomic.
        let result = sqlx::query(
            r#"
            INSERT INTO articles (url, title, content, published_at, images, first_seen_at)
            SELECT ?, ?, ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM articles WHERE url LIKE ? ESCAPE '\')
            "#,
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.date)
        .bind(images)
        .bind(Utc::now().naive_utc())
        .bind(&like)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
