pub mod error;
pub mod in_memory_repository;
pub mod model;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use error::{FeedbackError, Result};
pub use in_memory_repository::InMemoryFeedbackRepository;
pub use model::{Feedback, FeedbackId};
pub use postgres_repository::PostgresFeedbackRepository;
pub use repository::FeedbackRepository;
pub use service::FeedbackService;
