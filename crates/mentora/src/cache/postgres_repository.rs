use async_trait::async_trait;
use sqlx::{Row, postgres::PgPool};

use super::{CacheError, CacheKey, ContentCache, ContentKind, Result};

/// PostgreSQL implementation of ContentCache, backed by
/// `generated_content_cache`
pub struct PostgresContentCache {
    pool: PgPool,
}

impl PostgresContentCache {
    /// Create a new PostgresContentCache
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentCache for PostgresContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query(
            r#"
            SELECT content
            FROM generated_content_cache
            WHERE cache_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CacheError::Database(format!("could not read cache: {}", e)))?;

        Ok(row.map(|row| row.get::<serde_json::Value, _>("content")))
    }

    async fn set(
        &self,
        key: &CacheKey,
        kind: ContentKind,
        payload: &serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO generated_content_cache (cache_key, content_type, content)
            VALUES ($1, $2, $3)
            ON CONFLICT (cache_key) DO NOTHING
            "#,
        )
        .bind(key.as_str())
        .bind(kind.to_string())
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| CacheError::Database(format!("could not write cache: {}", e)))?;

        Ok(())
    }
}
