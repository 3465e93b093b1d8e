use super::{Profile, Result, UserId};
use async_trait::async_trait;

/// Repository trait for user profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile; fails if the ID is taken
    async fn create(&self, profile: Profile) -> Result<Profile>;

    /// Get a profile by ID
    async fn get(&self, id: &UserId) -> Result<Option<Profile>>;

    /// Replace a stored profile
    async fn update(&self, profile: Profile) -> Result<Profile>;

    /// Resolve several IDs at once; unknown IDs are skipped
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<Profile>>;
}
