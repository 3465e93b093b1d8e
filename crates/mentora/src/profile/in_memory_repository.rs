use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{Profile, ProfileError, ProfileRepository, Result, UserId};

/// In-memory implementation of ProfileRepository
///
/// Backs mock mode. Every call sleeps for the configured latency to mimic a
/// network round-trip, but never fails with a backend error.
#[derive(Clone)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
    latency: Duration,
}

impl InMemoryProfileRepository {
    /// Create a new in-memory profile repository with no latency
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create a repository that delays every call
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: Profile) -> Result<Profile> {
        self.simulate_latency().await;
        let mut profiles = self.profiles.write().await;

        if profiles.contains_key(&profile.id) {
            return Err(ProfileError::AlreadyExists(profile.id.to_string()));
        }

        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get(&self, id: &UserId) -> Result<Option<Profile>> {
        self.simulate_latency().await;
        let profiles = self.profiles.read().await;
        Ok(profiles.get(id).cloned())
    }

    async fn update(&self, profile: Profile) -> Result<Profile> {
        self.simulate_latency().await;
        let mut profiles = self.profiles.write().await;

        if !profiles.contains_key(&profile.id) {
            return Err(ProfileError::NotFound(profile.id.to_string()));
        }

        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        self.simulate_latency().await;
        let profiles = self.profiles.read().await;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileDetails, Role};

    fn create_test_profile(id: &str, role: Role) -> Profile {
        Profile::new(
            UserId::from_string(id),
            ProfileDetails {
                email: format!("{}@example.com", id),
                name: id.to_string(),
                role,
                class_level: None,
                is_verified: false,
            },
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProfileRepository::new();
        let profile = create_test_profile("ada", Role::Student);
        let id = profile.id.clone();

        let created = repo.create(profile).await.unwrap();
        assert_eq!(created.name, "ada");

        let retrieved = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(retrieved, created);
    }

    #[tokio::test]
    async fn test_duplicate_id_error() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("ada", Role::Student))
            .await
            .unwrap();
        let result = repo.create(create_test_profile("ada", Role::Teacher)).await;

        assert!(matches!(result, Err(ProfileError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let repo = InMemoryProfileRepository::new();
        let result = repo.update(create_test_profile("ghost", Role::Parent)).await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let repo = InMemoryProfileRepository::new();
        repo.create(create_test_profile("a", Role::Student))
            .await
            .unwrap();
        repo.create(create_test_profile("b", Role::Student))
            .await
            .unwrap();

        let ids = vec![
            UserId::from_string("b"),
            UserId::from_string("missing"),
            UserId::from_string("a"),
        ];
        let found = repo.get_many(&ids).await.unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let repo = InMemoryProfileRepository::with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        repo.get(&UserId::from_string("nobody")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
