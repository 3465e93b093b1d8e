//! Error types for mentora-gemini

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    /// Transport failure before any HTTP status was received
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status. `status` is the API's status name, such as
    /// `RESOURCE_EXHAUSTED`, when the body carried one.
    #[error("HTTP {code}{}: {message}", .status.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default())]
    Api {
        code: u16,
        status: Option<String>,
        message: String,
    },

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("client setup failed: {0}")]
    Client(String),
}

// Keep the provider's wording so the service layer can classify it.
// Unreadable or empty replies are processing failures, not provider errors.
impl From<GeminiError> for mentora_core::CoreError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Decode(_) | GeminiError::EmptyResponse(_) => {
                mentora_core::CoreError::Processing(err.to_string())
            }
            _ => mentora_core::CoreError::Provider(err.to_string()),
        }
    }
}
