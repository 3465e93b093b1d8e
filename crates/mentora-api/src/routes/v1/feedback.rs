use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use mentora::feedback::Feedback;
use mentora::profile::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{ApiResult, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub user_id: Option<String>,
    /// 1 to 5
    pub rating: Option<u8>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDto {
    pub id: String,
    pub user_id: Option<String>,
    pub rating: Option<u8>,
    pub comments: Option<String>,
    pub created_at: String,
}

impl From<Feedback> for FeedbackDto {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id.to_string(),
            user_id: feedback.user_id.map(|id| id.as_str().to_string()),
            rating: feedback.rating,
            comments: feedback.comments,
            created_at: feedback.created_at.to_rfc3339(),
        }
    }
}

/// Submit feedback about the app
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackDto),
        (status = 400, description = "Empty feedback or rating out of range", body = crate::ErrorResponse)
    ),
    tag = "feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    let feedback = state
        .app
        .feedback()
        .submit(
            request.user_id.map(UserId::from_string),
            request.rating,
            request.comments,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(FeedbackDto::from(feedback))))
}

pub fn routes() -> axum::Router<AppState> {
    use axum::routing::post;

    axum::Router::new().route("/", post(submit_feedback))
}
