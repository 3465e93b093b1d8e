use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Invalid feedback: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
