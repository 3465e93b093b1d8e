use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;
