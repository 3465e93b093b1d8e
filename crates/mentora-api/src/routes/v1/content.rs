//! Generated learning content.
//!
//! Lessons, quizzes, diagnostic quizzes and flashcards are served from the
//! content cache when possible; everything else is generated per request.

use axum::{Json, extract::State, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mentora::ContentPart;
use mentora::generation::{DiagnosticAnswer, TopicRef, analyze};
use mentora::profile::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::profile::{ProfileDto, parse_class_level};
use crate::{ApiError, ApiResult, AppState};

const DEFAULT_QUESTION_COUNT: usize = 5;
const DEFAULT_FLASHCARD_COUNT: usize = 10;
const DEFAULT_STUDY_DAYS: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicDto {
    pub id: String,
    pub name: String,
}

impl From<TopicDto> for TopicRef {
    fn from(topic: TopicDto) -> Self {
        TopicRef::new(topic.id, topic.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequest {
    pub topic: TopicDto,
    pub subject: String,
    pub class_level: Option<String>,
}

/// Quiz or flashcard request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemsRequest {
    pub topic: TopicDto,
    pub class_level: Option<String>,
    /// Clamped to 1..=20
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticQuizRequest {
    pub subject: String,
    pub topics: Vec<TopicDto>,
    pub class_level: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticAnswerDto {
    pub topic_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticAnalysisRequest {
    pub answers: Vec<DiagnosticAnswerDto>,
    /// When set, the result is stored on this student's profile
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticAnalysisResponse {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub profile: Option<ProfileDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EssayPromptRequest {
    pub topic: String,
    pub class_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EssayFeedbackRequest {
    pub prompt: String,
    pub essay: String,
    pub class_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub text: String,
    pub class_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    pub weaknesses: Vec<String>,
    pub class_level: Option<String>,
    /// Clamped to 1..=14
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageRequest {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub mime_type: String,
    /// Base64
    pub data: String,
}

/// Photo or document attached to a question
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub mime_type: String,
    /// Base64
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub question: String,
    pub class_level: Option<String>,
    pub attachment: Option<AttachmentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExplanationResponse {
    pub explanation: String,
}

fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Lesson for a topic
#[utoipa::path(
    post,
    path = "/api/v1/content/lesson",
    request_body = LessonRequest,
    responses(
        (status = 200, description = "Lesson content"),
        (status = 429, description = "Rate limited", body = crate::ErrorResponse),
        (status = 502, description = "Malformed model response", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn lesson(
    State(state): State<AppState>,
    Json(request): Json<LessonRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.topic.name, "topic name")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let lesson = state
        .app
        .generation()
        .lesson_content(&request.topic.into(), &request.subject, &class_level)
        .await?;
    Ok(Json(lesson))
}

/// Multiple-choice quiz for a topic
#[utoipa::path(
    post,
    path = "/api/v1/content/quiz",
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Quiz questions"),
        (status = 429, description = "Rate limited", body = crate::ErrorResponse),
        (status = 502, description = "Malformed model response", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn quiz(
    State(state): State<AppState>,
    Json(request): Json<ItemsRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.topic.name, "topic name")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let questions = state
        .app
        .generation()
        .quiz(
            &request.topic.into(),
            &class_level,
            request.count.unwrap_or(DEFAULT_QUESTION_COUNT),
        )
        .await?;
    Ok(Json(questions))
}

/// Flashcards for a topic
#[utoipa::path(
    post,
    path = "/api/v1/content/flashcards",
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Flashcards"),
        (status = 429, description = "Rate limited", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn flashcards(
    State(state): State<AppState>,
    Json(request): Json<ItemsRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.topic.name, "topic name")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let cards = state
        .app
        .generation()
        .flashcards(
            &request.topic.into(),
            &class_level,
            request.count.unwrap_or(DEFAULT_FLASHCARD_COUNT),
        )
        .await?;
    Ok(Json(cards))
}

/// Diagnostic quiz across several topics of a subject
#[utoipa::path(
    post,
    path = "/api/v1/content/diagnostic",
    request_body = DiagnosticQuizRequest,
    responses(
        (status = 200, description = "Diagnostic questions tagged by topic"),
        (status = 400, description = "No topics given", body = crate::ErrorResponse),
        (status = 502, description = "Malformed model response", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn diagnostic_quiz(
    State(state): State<AppState>,
    Json(request): Json<DiagnosticQuizRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.subject, "subject")?;
    if request.topics.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one topic is required".to_string(),
        ));
    }
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let topics: Vec<TopicRef> = request.topics.into_iter().map(TopicRef::from).collect();
    let questions = state
        .app
        .generation()
        .diagnostic_quiz(
            &request.subject,
            &topics,
            &class_level,
            request.count.unwrap_or(DEFAULT_QUESTION_COUNT),
        )
        .await?;
    Ok(Json(questions))
}

/// Strengths and weaknesses from diagnostic answers
#[utoipa::path(
    post,
    path = "/api/v1/content/diagnostic/analysis",
    request_body = DiagnosticAnalysisRequest,
    responses(
        (status = 200, description = "Per-topic analysis", body = DiagnosticAnalysisResponse),
        (status = 404, description = "Profile not found", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn diagnostic_analysis(
    State(state): State<AppState>,
    Json(request): Json<DiagnosticAnalysisRequest>,
) -> ApiResult<Json<DiagnosticAnalysisResponse>> {
    let answers: Vec<DiagnosticAnswer> = request
        .answers
        .into_iter()
        .map(|a| DiagnosticAnswer::new(a.topic_id, a.correct))
        .collect();
    let analysis = analyze(&answers);

    let profile = match request.user_id {
        Some(id) => Some(ProfileDto::from(
            state
                .app
                .profiles()
                .record_diagnostic(&UserId::from_string(id), &analysis)
                .await?,
        )),
        None => None,
    };

    Ok(Json(DiagnosticAnalysisResponse {
        strengths: analysis.strengths,
        weaknesses: analysis.weaknesses,
        profile,
    }))
}

/// Essay assignment
#[utoipa::path(
    post,
    path = "/api/v1/content/essay-prompt",
    request_body = EssayPromptRequest,
    responses(
        (status = 200, description = "Essay prompt")
    ),
    tag = "content"
)]
pub async fn essay_prompt(
    State(state): State<AppState>,
    Json(request): Json<EssayPromptRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.topic, "topic")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let prompt = state
        .app
        .generation()
        .essay_prompt(&request.topic, &class_level)
        .await?;
    Ok(Json(prompt))
}

/// Feedback on a student's essay
#[utoipa::path(
    post,
    path = "/api/v1/content/essay-feedback",
    request_body = EssayFeedbackRequest,
    responses(
        (status = 200, description = "Essay feedback"),
        (status = 422, description = "Blocked by safety filters", body = crate::ErrorResponse)
    ),
    tag = "content"
)]
pub async fn essay_feedback(
    State(state): State<AppState>,
    Json(request): Json<EssayFeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.essay, "essay")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let feedback = state
        .app
        .generation()
        .essay_feedback(&request.prompt, &request.essay, &class_level)
        .await?;
    Ok(Json(feedback))
}

/// Summary of study material
#[utoipa::path(
    post,
    path = "/api/v1/content/summary",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary")
    ),
    tag = "content"
)]
pub async fn summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&request.text, "text")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let summary = state
        .app
        .generation()
        .summary(&request.text, &class_level)
        .await?;
    Ok(Json(summary))
}

/// Study plan targeting weak topics
#[utoipa::path(
    post,
    path = "/api/v1/content/study-plan",
    request_body = StudyPlanRequest,
    responses(
        (status = 200, description = "Study plan")
    ),
    tag = "content"
)]
pub async fn study_plan(
    State(state): State<AppState>,
    Json(request): Json<StudyPlanRequest>,
) -> ApiResult<impl IntoResponse> {
    let class_level = parse_class_level(request.class_level.as_deref())?;
    let plan = state
        .app
        .generation()
        .study_plan(
            &request.weaknesses,
            &class_level,
            request.days.unwrap_or(DEFAULT_STUDY_DAYS),
        )
        .await?;
    Ok(Json(plan))
}

/// Educational illustration
#[utoipa::path(
    post,
    path = "/api/v1/content/image",
    request_body = ImageRequest,
    responses(
        (status = 200, description = "Generated image", body = ImageResponse)
    ),
    tag = "content"
)]
pub async fn image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> ApiResult<Json<ImageResponse>> {
    require(&request.description, "description")?;
    let image = state.app.generation().image(&request.description).await?;
    Ok(Json(ImageResponse {
        mime_type: image.mime_type,
        data: STANDARD.encode(image.data),
    }))
}

/// Explanation of a question, optionally about an attached photo
#[utoipa::path(
    post,
    path = "/api/v1/content/explanation",
    request_body = ExplanationRequest,
    responses(
        (status = 200, description = "Explanation", body = ExplanationResponse)
    ),
    tag = "content"
)]
pub async fn explanation(
    State(state): State<AppState>,
    Json(request): Json<ExplanationRequest>,
) -> ApiResult<Json<ExplanationResponse>> {
    require(&request.question, "question")?;
    let class_level = parse_class_level(request.class_level.as_deref())?;

    let attachment = match request.attachment {
        Some(attachment) => {
            STANDARD
                .decode(attachment.data.as_bytes())
                .map_err(|_| ApiError::BadRequest("attachment is not valid base64".to_string()))?;
            Some(ContentPart::InlineData {
                mime_type: attachment.mime_type,
                data: attachment.data,
            })
        }
        None => None,
    };

    let explanation = state
        .app
        .generation()
        .explanation(&request.question, &class_level, attachment)
        .await?;
    Ok(Json(ExplanationResponse { explanation }))
}

pub fn routes() -> axum::Router<AppState> {
    use axum::routing::post;

    axum::Router::new()
        .route("/lesson", post(lesson))
        .route("/quiz", post(quiz))
        .route("/flashcards", post(flashcards))
        .route("/diagnostic", post(diagnostic_quiz))
        .route("/diagnostic/analysis", post(diagnostic_analysis))
        .route("/essay-prompt", post(essay_prompt))
        .route("/essay-feedback", post(essay_feedback))
        .route("/summary", post(summary))
        .route("/study-plan", post(study_plan))
        .route("/image", post(image))
        .route("/explanation", post(explanation))
}
