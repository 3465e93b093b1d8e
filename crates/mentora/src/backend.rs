//! Choose between the live backend and the in-memory mock.

use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use strum_macros::Display;
use tracing::warn;

use crate::config::DatabaseConfig;

/// Values shipped in sample configuration files that mean "not configured"
pub const PLACEHOLDER_KEYS: &[&str] = &[
    "your-api-key",
    "YOUR_API_KEY",
    "your_supabase_anon_key",
    "YOUR_SUPABASE_ANON_KEY",
    "changeme",
    "placeholder",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendMode {
    Live,
    Mock,
}

impl BackendMode {
    /// Pick the backend for a configuration
    ///
    /// Live needs a usable API key, a parseable database URL and a parseable
    /// auth URL. Anything less runs against the mock.
    pub fn select(config: &DatabaseConfig) -> Self {
        let key_usable = config
            .api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key));
        let url_usable = config
            .url
            .as_deref()
            .map(str::trim)
            .is_some_and(|url| !url.is_empty() && PgConnectOptions::from_str(url).is_ok());
        let auth_url_usable = config
            .auth_url
            .as_deref()
            .map(str::trim)
            .is_some_and(|url| reqwest::Url::parse(url).is_ok());

        if key_usable && url_usable && auth_url_usable {
            BackendMode::Live
        } else {
            warn!(
                key_usable,
                url_usable,
                auth_url_usable,
                "backend not configured, running against the in-memory mock"
            );
            BackendMode::Mock
        }
    }

    pub fn is_mock(self) -> bool {
        self == BackendMode::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, key: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            url: url.map(String::from),
            api_key: key.map(String::from),
            auth_url: Some("https://auth.example.com/auth/v1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_live_when_configured() {
        let mode = BackendMode::select(&config(Some("postgres://db/app"), Some("eyJhbGci")));
        assert_eq!(mode, BackendMode::Live);
        assert!(!mode.is_mock());
    }

    #[test]
    fn test_mock_for_missing_or_blank_key() {
        assert!(BackendMode::select(&config(Some("postgres://db/app"), None)).is_mock());
        assert!(BackendMode::select(&config(Some("postgres://db/app"), Some("   "))).is_mock());
    }

    #[test]
    fn test_mock_for_placeholders() {
        for key in PLACEHOLDER_KEYS {
            let mode = BackendMode::select(&config(Some("postgres://db/app"), Some(key)));
            assert_eq!(mode, BackendMode::Mock, "{key} should select mock");
        }
    }

    #[test]
    fn test_mock_without_url() {
        assert!(BackendMode::select(&config(None, Some("eyJhbGci"))).is_mock());
        assert!(BackendMode::select(&config(Some(""), Some("eyJhbGci"))).is_mock());
    }

    #[test]
    fn test_mock_without_usable_auth_url() {
        let mut missing = config(Some("postgres://db/app"), Some("eyJhbGci"));
        missing.auth_url = None;
        assert!(BackendMode::select(&missing).is_mock());

        let mut garbled = config(Some("postgres://db/app"), Some("eyJhbGci"));
        garbled.auth_url = Some("not a url".to_string());
        assert!(BackendMode::select(&garbled).is_mock());
    }

    #[test]
    fn test_mock_for_unparseable_database_url() {
        assert!(BackendMode::select(&config(Some("not a database url"), Some("eyJhbGci"))).is_mock());
    }

    #[test]
    fn test_display() {
        assert_eq!(BackendMode::Live.to_string(), "live");
        assert_eq!(BackendMode::Mock.to_string(), "mock");
    }
}
