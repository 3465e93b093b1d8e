use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use super::{AuthEvent, AuthEventKind, Credentials, Result, Session, SignUpMetadata};
use crate::profile::UserId;

const EVENT_CAPACITY: usize = 16;

/// Authentication provider
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Register an account; does not sign in
    async fn sign_up(&self, credentials: &Credentials, metadata: SignUpMetadata)
    -> Result<UserId>;

    /// Sign in and publish a session event
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    /// Sign out and publish a session event
    async fn sign_out(&self) -> Result<()>;

    /// Session currently held by the backend
    async fn current_session(&self) -> Option<Session>;

    /// Receive session change events
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Current session plus its change notifications, shared by backends
#[derive(Clone)]
pub struct SessionHub {
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Replace the session and notify subscribers
    pub async fn publish(&self, kind: AuthEventKind, session: Option<Session>) {
        *self.session.write().await = session.clone();
        let event = AuthEvent { kind, session };
        // No subscribers is fine
        if self.events.send(event).is_err() {
            debug!(kind = %kind, "auth event dropped, nobody is listening");
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}
