use super::{Feedback, Result};
use async_trait::async_trait;

/// Append-only store for user feedback
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback>;

    /// All feedback, oldest first
    async fn list(&self) -> Result<Vec<Feedback>>;
}
