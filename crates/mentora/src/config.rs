use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Mentora configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MentoraConfig {
    /// Database and auth service
    pub database: DatabaseConfig,

    /// Content generation provider
    pub generation: GenerationConfig,

    /// Mock backend behavior
    pub mock: MockConfig,

    /// Log level
    pub log_level: Option<String>,
}

impl MentoraConfig {
    /// Load from configuration file
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Defaults overlaid with `MENTORA_*` variables, reading `.env` if present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::default().merge_env(|name| std::env::var(name).ok())
    }

    /// Overlay values from an environment lookup; blank values are ignored
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("MENTORA_DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(key) = get("MENTORA_DATABASE_API_KEY") {
            self.database.api_key = Some(key);
        }
        if let Some(url) = get("MENTORA_AUTH_URL") {
            self.database.auth_url = Some(url);
        }
        if let Some(key) = get("MENTORA_GEMINI_API_KEY") {
            self.generation.api_key = Some(key);
        }
        if let Some(url) = get("MENTORA_GEMINI_BASE_URL") {
            self.generation.api_base_url = url;
        }
        if let Some(model) = get("MENTORA_TEXT_MODEL") {
            self.generation.text_model = model;
        }
        if let Some(model) = get("MENTORA_IMAGE_MODEL") {
            self.generation.image_model = model;
        }
        if let Some(latency) = get("MENTORA_MOCK_LATENCY_MS").and_then(|v| v.parse().ok()) {
            self.mock.latency_ms = latency;
        }
        if let Some(level) = get("MENTORA_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        self
    }
}

/// Database and auth service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection string
    pub url: Option<String>,

    /// Anon key for the hosted backend
    pub api_key: Option<String>,

    /// Auth service root (e.g., "https://<project>.example.co/auth/v1")
    pub auth_url: Option<String>,

    /// Connection pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            auth_url: None,
            max_connections: 5,
        }
    }
}

/// Content generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_key: Option<String>,

    pub api_base_url: String,

    /// Model for structured text content
    pub text_model: String,

    /// Model for illustrations
    pub image_model: String,

    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Mock backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Simulated round-trip for every mock call
    pub latency_ms: u64,
}

impl MockConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { latency_ms: 300 }
    }
}
