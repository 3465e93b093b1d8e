//! Main crate for Mentora
//!
//! The data and content layer of an AI tutoring platform: student profiles
//! and progress, generated-content caching, the generation facade and the
//! session bridge, each backed by either a live Postgres/auth service or an
//! in-memory mock.

pub mod app;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod notification;
pub mod profile;

// Re-export core types
pub use mentora_core::{
    ContentPart, CoreError, GenerationOutput, GenerationRequest, GenerationResponse, Generator,
    GeneratorExt, GeneratorMetadata, RequestId, SharedGenerator,
};

// Re-export app types
pub use app::{AppMetadata, MentoraApp, MentoraAppBuilder};
pub use backend::BackendMode;
pub use config::MentoraConfig;

// Re-export error types
pub use error::{MentoraError, Result as MentoraResult};

#[cfg(feature = "gemini")]
pub use mentora_gemini::GeminiGenerator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::MentoraApp;
    pub use crate::generation::{GenerationError, GenerationService, TopicRef};
    pub use crate::profile::{ClassLevel, Profile, ProfileService, Role, UserId};
    pub use mentora_core::{GenerationRequest, GenerationResponse, Generator};
}
