use mentora_core::CoreError;
use thiserror::Error;

/// Generation failures, grouped by what the learner should be told
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation failed: {0}")]
    Generic(String),
}

const RATE_LIMIT_MARKERS: &[&str] = &["resource_exhausted", "http 429", "quota", "rate limit"];
const SAFETY_MARKERS: &[&str] = &["safety", "blocked"];
const NETWORK_MARKERS: &[&str] = &[
    "network",
    "connection",
    "timed out",
    "timeout",
    "unreachable",
    "failed to fetch",
    "dns",
];

impl GenerationError {
    /// Map a provider error message onto a category
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        let matches_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

        if matches_any(RATE_LIMIT_MARKERS) {
            GenerationError::RateLimited(message)
        } else if matches_any(SAFETY_MARKERS) {
            GenerationError::SafetyBlocked(message)
        } else if matches_any(NETWORK_MARKERS) {
            GenerationError::Network(message)
        } else {
            GenerationError::Generic(message)
        }
    }

    /// Message shown to the learner
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::RateLimited(_) => {
                "The AI tutor is busy right now. Please wait a minute and try again."
            }
            GenerationError::SafetyBlocked(_) => {
                "That request could not be answered. Please try rephrasing it."
            }
            GenerationError::Network(_) => {
                "We could not reach the AI tutor. Please check your internet connection."
            }
            GenerationError::MalformedResponse(_) => {
                "The AI tutor sent an unexpected answer. Please try again."
            }
            GenerationError::Generic(_) => "Something went wrong while creating your content.",
        }
    }
}

impl From<CoreError> for GenerationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Provider(message) => Self::classify(message),
            CoreError::Processing(message) => GenerationError::MalformedResponse(message),
            CoreError::InvalidRequest(message) => GenerationError::Generic(message),
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_exhausted_is_rate_limit() {
        let err = GenerationError::classify(
            "HTTP 429 Too Many Requests [RESOURCE_EXHAUSTED]: Quota exceeded",
        );
        assert!(matches!(err, GenerationError::RateLimited(_)));
        assert_ne!(
            err.user_message(),
            GenerationError::Generic(String::new()).user_message()
        );

        let bare = GenerationError::from(CoreError::Provider("RESOURCE_EXHAUSTED".to_string()));
        assert!(matches!(bare, GenerationError::RateLimited(_)));
    }

    #[test]
    fn test_stray_digits_are_not_rate_limits() {
        let err = GenerationError::classify("HTTP 500: request 84291 failed after 4290 bytes");
        assert!(matches!(err, GenerationError::Generic(_)));
    }

    #[test]
    fn test_processing_failure_is_malformed() {
        let err = GenerationError::from(CoreError::Processing(
            "failed to decode response: missing field `candidates`".to_string(),
        ));
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_safety_and_network_categories() {
        assert!(matches!(
            GenerationError::classify("prompt blocked: SAFETY"),
            GenerationError::SafetyBlocked(_)
        ));
        assert!(matches!(
            GenerationError::classify("error sending request: connection refused"),
            GenerationError::Network(_)
        ));
    }

    #[test]
    fn test_unknown_message_is_generic() {
        let err = GenerationError::classify("HTTP 500: internal");
        assert!(matches!(err, GenerationError::Generic(_)));
        assert_eq!(
            err.user_message(),
            "Something went wrong while creating your content."
        );
    }

    #[test]
    fn test_invalid_request_is_generic() {
        let err = GenerationError::from(CoreError::InvalidRequest("quota".to_string()));
        assert!(matches!(err, GenerationError::Generic(_)));
    }

    #[test]
    fn test_parse_failure_is_malformed() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(
            GenerationError::from(parse_err),
            GenerationError::MalformedResponse(_)
        ));
    }
}
