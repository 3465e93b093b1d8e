use super::{CacheKey, ContentKind, Result};
use async_trait::async_trait;

/// Key-value store for previously generated content
///
/// Writing an existing key must be a harmless no-op: two requests can race to
/// fill the same entry.
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Look up a cached payload
    async fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>>;

    /// Store a payload unless the key is already present
    async fn set(&self, key: &CacheKey, kind: ContentKind, payload: &serde_json::Value)
    -> Result<()>;
}
