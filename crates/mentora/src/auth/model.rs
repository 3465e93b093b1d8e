use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::profile::{ClassLevel, Profile, ProfileDetails, Role, UserId};

/// Email and password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Data captured at sign-up and carried on the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub class_level: Option<ClassLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub metadata: SignUpMetadata,
}

impl SessionUser {
    /// Profile details for a first login, falling back to a student in the
    /// baseline class when the metadata is silent
    pub fn profile_details(&self) -> ProfileDetails {
        let role = self.metadata.role.unwrap_or(Role::Student);
        let name = self
            .metadata
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string());

        ProfileDetails {
            email: self.email.clone(),
            name,
            role,
            class_level: match role {
                Role::Student => Some(self.metadata.class_level.clone().unwrap_or_default()),
                Role::Teacher | Role::Parent => None,
            },
            is_verified: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: SessionUser,
}

/// Backend event kind; carried for logging only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

/// Who is using the app right now
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    /// A session arrived and its profile is being fetched or created
    Authenticating,
    SignedIn(Profile),
}

impl AuthState {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            AuthState::SignedIn(profile) => Some(profile),
            AuthState::SignedOut | AuthState::Authenticating => None,
        }
    }
}

/// Delivered to the session subscriber on every state change
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub state: AuthState,
    /// Terminal auth error that forced a sign-out
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(metadata: SignUpMetadata) -> SessionUser {
        SessionUser {
            id: UserId::from_string("u1"),
            email: "lee.chen@example.com".to_string(),
            metadata,
        }
    }

    #[test]
    fn test_profile_details_defaults() {
        let details = user(SignUpMetadata::default()).profile_details();
        assert_eq!(details.role, Role::Student);
        assert_eq!(details.class_level.unwrap().as_str(), "6");
        assert_eq!(details.name, "lee.chen");
    }

    #[test]
    fn test_profile_details_from_metadata() {
        let details = user(SignUpMetadata {
            name: Some("Lee".to_string()),
            role: Some(Role::Parent),
            class_level: Some(ClassLevel::parse("3").unwrap()),
        })
        .profile_details();
        assert_eq!(details.role, Role::Parent);
        assert_eq!(details.name, "Lee");
        assert!(details.class_level.is_none());
    }

    #[test]
    fn test_metadata_wire_format() {
        let metadata: SignUpMetadata =
            serde_json::from_str(r#"{"name": "Ana", "role": "teacher", "class_level": "8"}"#)
                .unwrap();
        assert_eq!(metadata.role, Some(Role::Teacher));
        assert_eq!(metadata.class_level.unwrap().as_str(), "8");
    }
}
