use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CacheKey, ContentCache, ContentKind, Result};

/// Stored cache entry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub content_kind: ContentKind,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// In-memory implementation of ContentCache
#[derive(Clone, Default)]
pub struct InMemoryContentCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl InMemoryContentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Full entry for a key
    pub async fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl ContentCache for InMemoryContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|e| e.payload.clone()))
    }

    async fn set(
        &self,
        key: &CacheKey,
        kind: ContentKind,
        payload: &serde_json::Value,
    ) -> Result<()> {
        let mut entries = self.entries.write().await;

        // First writer wins
        if let Entry::Vacant(slot) = entries.entry(key.clone()) {
            slot.insert(CacheEntry {
                key: key.clone(),
                content_kind: kind,
                payload: payload.clone(),
                created_at: Utc::now(),
            });
        }

        Ok(())
    }
}
