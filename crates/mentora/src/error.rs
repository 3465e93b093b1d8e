//! Error types for mentora crate

use thiserror::Error;

use crate::auth::AuthError;
use crate::cache::CacheError;
use crate::feedback::FeedbackError;
use crate::generation::GenerationError;
use crate::profile::ProfileError;

#[derive(Error, Debug)]
pub enum MentoraError {
    #[error("Core error: {0}")]
    Core(#[from] mentora_core::CoreError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("Build error: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, MentoraError>;
