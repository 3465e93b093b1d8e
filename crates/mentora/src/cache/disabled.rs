use async_trait::async_trait;

use super::{CacheKey, ContentCache, ContentKind, Result};

/// Cache used in mock mode: every lookup misses and writes are dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledContentCache;

#[async_trait]
impl ContentCache for DisabledContentCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<serde_json::Value>> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &CacheKey,
        _kind: ContentKind,
        _payload: &serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }
}
