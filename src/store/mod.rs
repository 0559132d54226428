//! History and favorites persistence seam.
//!
//! The forge only needs a narrow sink for finished items; real backends
//! (hosted Postgres, local SQLite, ...) implement [`CreationStore`] outside
//! this crate. [`MemoryStore`] covers tests and single-process use.

mod export;

pub use export::{ExportGroup, ExportMetadata, ExportPayload, APP_VERSION};

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::types::GeneratedItem;

/// Default number of history entries kept by [`MemoryStore`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

#[async_trait]
pub trait CreationStore: Send + Sync {
    /// Append a freshly generated item to history.
    async fn record(&self, item: &GeneratedItem) -> Result<()>;

    /// History, newest first.
    async fn history(&self, limit: Option<usize>) -> Result<Vec<GeneratedItem>>;

    /// Mark or unmark an item as favorite. Favorites outlive history.
    async fn set_favorite(&self, item: &GeneratedItem, favorite: bool) -> Result<()>;

    /// Favorites, most recently marked first.
    async fn favorites(&self) -> Result<Vec<GeneratedItem>>;

    async fn is_favorite(&self, id: Uuid) -> Result<bool>;

    /// Drop all history entries, returning how many were removed.
    async fn clear_history(&self) -> Result<usize>;

    /// Full history plus favorites, grouped for backup.
    async fn export(&self) -> Result<ExportPayload> {
        let history = self.history(None).await?;
        let favorites = self.favorites().await?;
        Ok(ExportPayload::build(history, favorites))
    }
}

#[derive(Default)]
struct Inner {
    history: VecDeque<GeneratedItem>,
    favorites: Vec<GeneratedItem>,
}

/// In-process store; history is bounded, oldest entries are evicted first.
pub struct MemoryStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }
}

#[async_trait]
impl CreationStore for MemoryStore {
    async fn record(&self, item: &GeneratedItem) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.history.retain(|existing| existing.id != item.id);
        inner.history.push_front(item.clone());
        while inner.history.len() > self.capacity {
            inner.history.pop_back();
        }
        Ok(())
    }

    async fn history(&self, limit: Option<usize>) -> Result<Vec<GeneratedItem>> {
        let inner = self.inner.read().await;
        let take = limit.unwrap_or(inner.history.len());
        Ok(inner.history.iter().take(take).cloned().collect())
    }

    async fn set_favorite(&self, item: &GeneratedItem, favorite: bool) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.favorites.retain(|existing| existing.id != item.id);
        if favorite {
            inner.favorites.insert(0, item.clone());
        }
        Ok(())
    }

    async fn favorites(&self) -> Result<Vec<GeneratedItem>> {
        Ok(self.inner.read().await.favorites.clone())
    }

    async fn is_favorite(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.read().await.favorites.iter().any(|f| f.id == id))
    }

    async fn clear_history(&self) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let removed = inner.history.len();
        inner.history.clear();
        Ok(removed)
    }
}
