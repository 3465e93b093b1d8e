use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tracing::info;
use uuid::Uuid;

use super::{
    AuthBackend, AuthError, AuthEvent, AuthEventKind, Credentials, Result, Session, SessionHub,
    SessionUser, SignUpMetadata,
};
use crate::profile::UserId;

#[derive(Debug, Clone)]
struct MockAccount {
    id: UserId,
    email: String,
    metadata: SignUpMetadata,
}

/// Local account store used in mock mode
///
/// Any non-empty password signs in to a registered email. User IDs are
/// derived from the email so they survive restarts.
#[derive(Clone)]
pub struct MockAuthBackend {
    accounts: Arc<RwLock<HashMap<String, MockAccount>>>,
    hub: SessionHub,
    latency: Duration,
}

impl MockAuthBackend {
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            hub: SessionHub::new(),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidCredentials(
            "a valid email is required".to_string(),
        ));
    }
    Ok(email)
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AuthError::InvalidCredentials(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: SignUpMetadata,
    ) -> Result<UserId> {
        let email = normalize_email(&credentials.email)?;
        require_password(&credentials.password)?;
        self.simulate_latency().await;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::AlreadyRegistered(email));
        }

        let id = UserId::from_email(&email);
        info!(user_id = %id, "registered mock account");
        accounts.insert(
            email.clone(),
            MockAccount {
                id: id.clone(),
                email,
                metadata,
            },
        );
        Ok(id)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let email = normalize_email(&credentials.email)?;
        require_password(&credentials.password)?;
        self.simulate_latency().await;

        let account = self
            .accounts
            .read()
            .await
            .get(&email)
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredentials(format!("no account for {email}")))?;

        let session = Session {
            access_token: Some(format!("mock-token-{}", Uuid::new_v4())),
            user: SessionUser {
                id: account.id,
                email: account.email,
                metadata: account.metadata,
            },
        };
        self.hub
            .publish(AuthEventKind::SignedIn, Some(session.clone()))
            .await;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.simulate_latency().await;
        self.hub.publish(AuthEventKind::SignedOut, None).await;
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.hub.current().await
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.hub.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Role;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let backend = MockAuthBackend::new();
        let mut events = backend.subscribe();
        let credentials = Credentials::new("Ana@Example.com", "secret");

        let id = backend
            .sign_up(
                &credentials,
                SignUpMetadata {
                    name: Some("Ana".to_string()),
                    role: Some(Role::Teacher),
                    class_level: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(id, UserId::from_email("ana@example.com"));
        // Registration alone publishes nothing
        assert!(events.try_recv().is_err());
        assert!(backend.current_session().await.is_none());

        let session = backend.sign_in(&credentials).await.unwrap();
        assert_eq!(session.user.id, id);
        assert_eq!(session.user.metadata.role, Some(Role::Teacher));

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedIn);
        assert_eq!(event.session.unwrap().user.id, id);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let backend = MockAuthBackend::new();
        let credentials = Credentials::new("a@b.c", "pw");
        backend
            .sign_up(&credentials, SignUpMetadata::default())
            .await
            .unwrap();

        let result = backend
            .sign_up(&Credentials::new(" A@B.C ", "pw2"), SignUpMetadata::default())
            .await;
        assert!(matches!(result, Err(AuthError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_or_empty_password() {
        let backend = MockAuthBackend::new();
        let result = backend.sign_in(&Credentials::new("x@y.z", "pw")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));

        backend
            .sign_up(&Credentials::new("x@y.z", "pw"), SignUpMetadata::default())
            .await
            .unwrap();
        let result = backend.sign_in(&Credentials::new("x@y.z", "")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let backend = MockAuthBackend::new();
        let credentials = Credentials::new("x@y.z", "pw");
        backend
            .sign_up(&credentials, SignUpMetadata::default())
            .await
            .unwrap();
        backend.sign_in(&credentials).await.unwrap();
        let mut events = backend.subscribe();

        backend.sign_out().await.unwrap();
        assert!(backend.current_session().await.is_none());
        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedOut);
        assert!(event.session.is_none());
    }
}
