pub mod error;
pub mod in_memory_repository;
pub mod model;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use error::{ProfileError, Result};
pub use in_memory_repository::InMemoryProfileRepository;
pub use model::{
    ClassLevel, Profile, ProfileDetails, ProfileUpdate, ProgressUpdate, Relation, Role,
    StudentRecord, UserId,
};
pub use postgres_repository::PostgresProfileRepository;
pub use repository::ProfileRepository;
pub use service::ProfileService;
