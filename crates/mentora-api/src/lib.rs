use axum::Router;
use mentora::MentoraApp;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod routes;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub app: MentoraApp,
}

impl AppState {
    pub fn new(app: MentoraApp) -> Self {
        Self { app }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::v1::profile::create_profile,
        crate::routes::v1::profile::get_profile,
        crate::routes::v1::profile::update_profile,
        crate::routes::v1::profile::update_progress,
        crate::routes::v1::profile::list_students,
        crate::routes::v1::profile::list_children,
        crate::routes::v1::content::lesson,
        crate::routes::v1::content::quiz,
        crate::routes::v1::content::flashcards,
        crate::routes::v1::content::diagnostic_quiz,
        crate::routes::v1::content::diagnostic_analysis,
        crate::routes::v1::content::essay_prompt,
        crate::routes::v1::content::essay_feedback,
        crate::routes::v1::content::summary,
        crate::routes::v1::content::study_plan,
        crate::routes::v1::content::image,
        crate::routes::v1::content::explanation,
        crate::routes::v1::feedback::submit_feedback,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::v1::profile::ProfileDto,
            crate::routes::v1::profile::CreateProfileRequest,
            crate::routes::v1::profile::UpdateProfileRequest,
            crate::routes::v1::profile::ProgressRequest,
            crate::routes::v1::content::TopicDto,
            crate::routes::v1::content::LessonRequest,
            crate::routes::v1::content::ItemsRequest,
            crate::routes::v1::content::DiagnosticQuizRequest,
            crate::routes::v1::content::DiagnosticAnswerDto,
            crate::routes::v1::content::DiagnosticAnalysisRequest,
            crate::routes::v1::content::DiagnosticAnalysisResponse,
            crate::routes::v1::content::EssayPromptRequest,
            crate::routes::v1::content::EssayFeedbackRequest,
            crate::routes::v1::content::SummaryRequest,
            crate::routes::v1::content::StudyPlanRequest,
            crate::routes::v1::content::ImageRequest,
            crate::routes::v1::content::ImageResponse,
            crate::routes::v1::content::AttachmentDto,
            crate::routes::v1::content::ExplanationRequest,
            crate::routes::v1::content::ExplanationResponse,
            crate::routes::v1::feedback::FeedbackRequest,
            crate::routes::v1::feedback::FeedbackDto,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "profiles", description = "Profiles and learning progress"),
        (name = "content", description = "AI-generated learning content"),
        (name = "feedback", description = "User feedback")
    )
)]
pub struct ApiDoc;

/// Build API application
pub fn build_app(state: AppState, enable_swagger: bool) -> Router {
    let router = Router::new().merge(routes::routes());
    let router = if enable_swagger {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
