use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Feedback, FeedbackRepository, Result};

#[derive(Clone, Default)]
pub struct InMemoryFeedbackRepository {
    entries: Arc<RwLock<Vec<Feedback>>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback> {
        self.entries.write().await.push(feedback.clone());
        Ok(feedback)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        Ok(self.entries.read().await.clone())
    }
}
