use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use super::{Feedback, FeedbackError, FeedbackId, FeedbackRepository, Result};
use crate::profile::UserId;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone)]
pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store feedback
    ///
    /// Blank comments count as no comments. At least a rating or comments
    /// must be present.
    pub async fn submit(
        &self,
        user_id: Option<UserId>,
        rating: Option<u8>,
        comments: Option<String>,
    ) -> Result<Feedback> {
        if let Some(rating) = rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(FeedbackError::InvalidData(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
                )));
            }
        }

        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if rating.is_none() && comments.is_none() {
            return Err(FeedbackError::InvalidData(
                "feedback needs a rating or comments".to_string(),
            ));
        }

        let feedback = Feedback {
            id: FeedbackId::new(),
            user_id,
            rating,
            comments,
            created_at: Utc::now(),
        };
        info!(feedback_id = %feedback.id, rating = ?feedback.rating, "feedback received");
        self.repository
            .insert(feedback)
            .await
            .inspect_err(|e| error!(error = %e, "failed to store feedback"))
    }

    pub async fn list(&self) -> Result<Vec<Feedback>> {
        self.repository.list().await
    }
}
