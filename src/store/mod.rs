//! The article store seam. The scraping path only ever writes, and only
//! through `insert_if_absent`; downstream consumers (entity extraction,
//! summarization, search) read and enrich the documents separately.

use crate::error::StoreError;
use crate::models::Article;
use async_trait::async_trait;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert the document unless a stored document's URL begins with the
    /// candidate's canonical prefix. Existing documents are never modified.
    /// Returns whether an insert actually happened; a skipped duplicate is
    /// a normal outcome, not an error.
    ///
    /// The check-and-insert is atomic per call. Two canonical prefixes that
    /// both refer to the same article (imperfect normalization) can still
    /// race to two documents; that limitation is accepted.
    async fn insert_if_absent(&self, article: &Article) -> Result<bool, StoreError>;

    /// Number of stored documents.
    async fn count(&self) -> Result<u64, StoreError>;
}
