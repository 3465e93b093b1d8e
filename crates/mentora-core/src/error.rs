//! Error types for mentora-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The provider rejected or failed the call. The message keeps the
    /// provider's own status text (e.g. `RESOURCE_EXHAUSTED`) so callers can
    /// classify it.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
