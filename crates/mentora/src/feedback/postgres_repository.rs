use async_trait::async_trait;
use sqlx::{Row, postgres::PgPool, postgres::PgRow};

use super::{Feedback, FeedbackError, FeedbackId, FeedbackRepository, Result};
use crate::profile::UserId;

pub struct PostgresFeedbackRepository {
    pool: PgPool,
}

impl PostgresFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_feedback(row: &PgRow) -> Feedback {
    let user_id: Option<String> = row.get("user_id");
    let rating: Option<i16> = row.get("rating");

    Feedback {
        id: FeedbackId::from_uuid(row.get("id")),
        user_id: user_id.map(UserId::from_string),
        rating: rating.and_then(|r| u8::try_from(r).ok()),
        comments: row.get("comments"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl FeedbackRepository for PostgresFeedbackRepository {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback> {
        sqlx::query(
            r#"
            INSERT INTO feedback (id, user_id, rating, comments, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(feedback.id.as_uuid())
        .bind(feedback.user_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(feedback.rating.map(i16::from))
        .bind(&feedback.comments)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FeedbackError::Database(format!("could not insert feedback: {e}")))?;

        Ok(feedback)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, rating, comments, created_at
            FROM feedback
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FeedbackError::Database(format!("could not list feedback: {e}")))?;

        Ok(rows.iter().map(row_to_feedback).collect())
    }
}
