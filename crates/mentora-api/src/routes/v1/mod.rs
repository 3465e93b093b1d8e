use crate::AppState;
use axum::Router;

pub mod content;
pub mod feedback;
pub mod profile;

/// API v1 routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/profiles", profile::routes())
        .nest("/content", content::routes())
        .nest("/feedback", feedback::routes())
}
