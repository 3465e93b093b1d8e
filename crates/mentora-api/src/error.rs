use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mentora::feedback::FeedbackError;
use mentora::generation::GenerationError;
use mentora::profile::ProfileError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Status code for each generation failure category
pub fn generation_status(err: &GenerationError) -> StatusCode {
    match err {
        GenerationError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        GenerationError::SafetyBlocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GenerationError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        GenerationError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Generation(e) => {
                error!(error = %e, "content generation failed");
                (generation_status(e), e.user_message().to_string())
            }
            ApiError::Profile(e) => match e {
                ProfileError::NotFound(_) => (StatusCode::NOT_FOUND, "Profile not found".to_string()),
                ProfileError::AlreadyExists(_) => {
                    (StatusCode::CONFLICT, "Profile already exists".to_string())
                }
                ProfileError::InvalidData(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ProfileError::NotAStudent(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Profile does not belong to a student".to_string(),
                ),
                ProfileError::Database(_) => {
                    error!(error = %e, "profile storage failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to access profiles".to_string(),
                    )
                }
            },
            ApiError::Feedback(e) => match e {
                FeedbackError::InvalidData(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                FeedbackError::Database(_) => {
                    error!(error = %e, "feedback storage failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to store feedback".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
