//! Application layer for Mentora
//!
//! `MentoraApp` owns every service the tutoring shell talks to. The backend
//! mode is decided once in [`MentoraAppBuilder::build`] and every repository,
//! the content cache and the auth backend follow from it.

use async_trait::async_trait;
use mentora_core::{
    CoreError, GenerationRequest, GenerationResponse, Generator, GeneratorExt, GeneratorMetadata,
    Result as CoreResult, SharedGenerator,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{AuthBackend, MockAuthBackend, RemoteAuthBackend, SessionBridge};
use crate::backend::BackendMode;
use crate::cache::{ContentCache, DisabledContentCache, PostgresContentCache};
use crate::config::MentoraConfig;
use crate::error::{MentoraError, Result};
use crate::feedback::{
    FeedbackRepository, FeedbackService, InMemoryFeedbackRepository, PostgresFeedbackRepository,
};
use crate::generation::{GenerationModels, GenerationService};
use crate::notification::NotificationCenter;
use crate::profile::{
    InMemoryProfileRepository, Profile, ProfileRepository, ProfileService,
    PostgresProfileRepository, ProgressUpdate, UserId,
};

/// Points needed for each level
pub const POINTS_PER_LEVEL: u32 = 100;

/// The main Mentora application
#[derive(Clone)]
pub struct MentoraApp {
    mode: BackendMode,
    metadata: AppMetadata,
    profiles: ProfileService,
    generation: GenerationService,
    feedback: FeedbackService,
    auth: Arc<dyn AuthBackend>,
    session: SessionBridge,
    notifications: NotificationCenter,
}

/// Metadata about the Mentora application
#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
}

impl MentoraApp {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> MentoraAppBuilder {
        MentoraAppBuilder::new(name)
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    pub fn generation(&self) -> &GenerationService {
        &self.generation
    }

    pub fn feedback(&self) -> &FeedbackService {
        &self.feedback
    }

    pub fn auth(&self) -> &Arc<dyn AuthBackend> {
        &self.auth
    }

    pub fn session(&self) -> &SessionBridge {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Mark a topic complete, award points and announce it
    pub async fn complete_topic(
        &self,
        user_id: &UserId,
        topic_id: &str,
        points: u32,
    ) -> Result<Profile> {
        let current = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| crate::profile::ProfileError::NotFound(user_id.to_string()))?;
        let student = current
            .student
            .as_ref()
            .ok_or_else(|| crate::profile::ProfileError::NotAStudent(user_id.to_string()))?;

        let total = student.points.saturating_add(points);
        let level = student.level.max(total / POINTS_PER_LEVEL + 1);
        let profile = self
            .profiles
            .update_progress(
                user_id,
                ProgressUpdate {
                    points: Some(total),
                    level: Some(level),
                    completed_topics: vec![topic_id.to_string()],
                    ..Default::default()
                },
            )
            .await?;

        self.notifications
            .notify(format!("Topic complete! +{points} points"), Some("trophy"))
            .await;
        Ok(profile)
    }
}

/// Builder for creating Mentora applications
pub struct MentoraAppBuilder {
    name: String,
    version: String,
    config: MentoraConfig,
    generator: Option<SharedGenerator>,
}

impl MentoraAppBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: MentoraConfig::default(),
            generator: None,
        }
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: MentoraConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this generator instead of the configured provider
    pub fn generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generator = Some(generator.shared());
        self
    }

    /// Build the application
    ///
    /// Must run inside a tokio runtime; the Postgres pool connects lazily.
    pub fn build(self) -> Result<MentoraApp> {
        let mode = BackendMode::select(&self.config.database);
        let latency = self.config.mock.latency();

        let (profile_repository, feedback_repository, cache, auth): (
            Arc<dyn ProfileRepository>,
            Arc<dyn FeedbackRepository>,
            Arc<dyn ContentCache>,
            Arc<dyn AuthBackend>,
        ) = match mode {
            BackendMode::Mock => (
                Arc::new(InMemoryProfileRepository::with_latency(latency)),
                Arc::new(InMemoryFeedbackRepository::new()),
                Arc::new(DisabledContentCache),
                Arc::new(MockAuthBackend::with_latency(latency)),
            ),
            BackendMode::Live => {
                let database = &self.config.database;
                let (Some(url), Some(api_key), Some(auth_url)) = (
                    database.url.as_deref(),
                    database.api_key.as_deref(),
                    database.auth_url.as_deref(),
                ) else {
                    return Err(MentoraError::Build(
                        "live backend needs database url, api key and auth url".to_string(),
                    ));
                };

                let pool = PgPoolOptions::new()
                    .max_connections(database.max_connections)
                    .connect_lazy(url)
                    .map_err(|e| MentoraError::Build(format!("invalid database url: {e}")))?;
                (
                    Arc::new(PostgresProfileRepository::new(pool.clone())),
                    Arc::new(PostgresFeedbackRepository::new(pool.clone())),
                    Arc::new(PostgresContentCache::new(pool)),
                    Arc::new(RemoteAuthBackend::new(auth_url, api_key)?),
                )
            }
        };

        let generator = match self.generator {
            Some(generator) => generator,
            None => configured_generator(&self.config)?,
        };
        let models = GenerationModels {
            text: self.config.generation.text_model.clone(),
            image: self.config.generation.image_model.clone(),
        };

        let profiles = ProfileService::new(profile_repository);
        let session = SessionBridge::new(Arc::clone(&auth), profiles.clone());
        info!(app = %self.name, mode = %mode, "mentora app ready");

        Ok(MentoraApp {
            mode,
            metadata: AppMetadata {
                name: self.name,
                version: self.version,
            },
            generation: GenerationService::new(generator, cache, models),
            feedback: FeedbackService::new(feedback_repository),
            profiles,
            auth,
            session,
            notifications: NotificationCenter::new(),
        })
    }
}

#[cfg(feature = "gemini")]
fn configured_generator(config: &MentoraConfig) -> Result<SharedGenerator> {
    let generation = &config.generation;
    match generation.api_key.as_deref() {
        Some(api_key) => {
            let generator = mentora_gemini::GeminiGenerator::new(
                &generation.api_base_url,
                api_key,
                generation.timeout_seconds,
            )
            .map_err(CoreError::from)?;
            Ok(generator.shared())
        }
        None => {
            warn!("generation API key is not set, content generation is unavailable");
            Ok(UnavailableGenerator.shared())
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn configured_generator(_config: &MentoraConfig) -> Result<SharedGenerator> {
    warn!("built without a generation provider, content generation is unavailable");
    Ok(UnavailableGenerator.shared())
}

/// Stands in when no provider is configured; every call fails
struct UnavailableGenerator;

#[async_trait]
impl Generator for UnavailableGenerator {
    async fn generate(&self, _request: GenerationRequest) -> CoreResult<GenerationResponse> {
        Err(CoreError::Provider(
            "content generation is not configured".to_string(),
        ))
    }

    fn metadata(&self) -> GeneratorMetadata {
        GeneratorMetadata {
            name: Some("unavailable".to_string()),
            description: Some("No generation provider configured".to_string()),
            ..Default::default()
        }
    }
}
