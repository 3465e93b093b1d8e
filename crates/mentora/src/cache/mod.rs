pub mod disabled;
pub mod error;
pub mod in_memory_repository;
pub mod key;
pub mod postgres_repository;
pub mod repository;

pub use disabled::DisabledContentCache;
pub use error::{CacheError, Result};
pub use in_memory_repository::InMemoryContentCache;
pub use key::{CacheKey, ContentKind, normalize_topic};
pub use postgres_repository::PostgresContentCache;
pub use repository::ContentCache;
