//! Turns auth backend session events into an application-level signed-in
//! profile.
//!
//! Each event carrying a session resolves the user's profile, creating it on
//! first login. Only the most recent event may publish its result: when a
//! newer event arrives while a profile lookup is in flight, the older lookup
//! is discarded. A single listener is active at any time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use super::{
    AuthBackend, AuthError, AuthEvent, AuthEventKind, AuthState, Result, Session, SessionUpdate,
};
use crate::profile::{Profile, ProfileError, ProfileService};

type Callback = dyn Fn(SessionUpdate) + Send + Sync;

#[derive(Clone)]
pub struct SessionBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    backend: Arc<dyn AuthBackend>,
    profiles: ProfileService,
    state: RwLock<AuthState>,
    latest_event: AtomicU64,
    listener: Mutex<Option<AbortHandle>>,
}

/// Handle to the active session listener; dropping it stops the listener
#[must_use = "the listener stops when the subscription is dropped"]
pub struct Subscription {
    handle: AbortHandle,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl SessionBridge {
    pub fn new(backend: Arc<dyn AuthBackend>, profiles: ProfileService) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                backend,
                profiles,
                state: RwLock::new(AuthState::SignedOut),
                latest_event: AtomicU64::new(0),
                listener: Mutex::new(None),
            }),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.inner.state.read().await.clone()
    }

    pub async fn current_profile(&self) -> Option<Profile> {
        self.inner.state.read().await.profile().cloned()
    }

    /// Start listening for session changes
    ///
    /// Replaces any previous listener. A session already held by the backend
    /// is processed first, as an initial-session event.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(SessionUpdate) + Send + Sync + 'static,
    {
        let mut receiver = self.inner.backend.subscribe();
        let inner = Arc::clone(&self.inner);
        let callback: Arc<Callback> = Arc::new(callback);

        let task = tokio::spawn(async move {
            if let Some(session) = inner.backend.current_session().await {
                let event = AuthEvent {
                    kind: AuthEventKind::InitialSession,
                    session: Some(session),
                };
                let _ = inner.handle(event, callback.as_ref()).await;
            }

            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        let _ = inner.handle(event, callback.as_ref()).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("session listener stopped");
        });

        let handle = task.abort_handle();
        let previous = match self.inner.listener.lock() {
            Ok(mut slot) => slot.replace(handle.clone()),
            Err(poisoned) => poisoned.into_inner().replace(handle.clone()),
        };
        if let Some(previous) = previous {
            previous.abort();
        }

        Subscription { handle }
    }

    /// Process one session event without a subscriber
    pub async fn handle_event(&self, event: AuthEvent) -> Result<AuthState> {
        self.inner.handle(event, &|_| {}).await
    }

    /// Sign out through the backend; the resulting event clears the state
    pub async fn logout(&self) -> Result<()> {
        self.inner.backend.sign_out().await?;
        // Lookups still in flight belong to the old session
        self.inner.latest_event.fetch_add(1, Ordering::SeqCst);
        self.inner.set_state(AuthState::SignedOut).await;
        Ok(())
    }
}

impl BridgeInner {
    async fn set_state(&self, state: AuthState) {
        *self.state.write().await = state;
    }

    fn is_stale(&self, sequence: u64) -> bool {
        self.latest_event.load(Ordering::SeqCst) != sequence
    }

    async fn handle(&self, event: AuthEvent, notify: &Callback) -> Result<AuthState> {
        let sequence = self.latest_event.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(kind = %event.kind, sequence, "session event");

        let Some(session) = event.session else {
            self.set_state(AuthState::SignedOut).await;
            notify(SessionUpdate {
                state: AuthState::SignedOut,
                error: None,
            });
            return Ok(AuthState::SignedOut);
        };

        self.set_state(AuthState::Authenticating).await;
        notify(SessionUpdate {
            state: AuthState::Authenticating,
            error: None,
        });

        match self.resolve_profile(&session).await {
            Ok(profile) => {
                if self.is_stale(sequence) {
                    debug!(sequence, "discarding stale profile lookup");
                    return Ok(self.state.read().await.clone());
                }
                info!(user_id = %profile.id, "signed in");
                let state = AuthState::SignedIn(profile);
                self.set_state(state.clone()).await;
                notify(SessionUpdate {
                    state: state.clone(),
                    error: None,
                });
                Ok(state)
            }
            Err(e) => {
                if self.is_stale(sequence) {
                    return Err(e);
                }
                error!(user_id = %session.user.id, error = %e, "profile bootstrap failed, signing out");
                if let Err(sign_out) = self.backend.sign_out().await {
                    warn!(error = %sign_out, "forced sign-out failed");
                }
                self.set_state(AuthState::SignedOut).await;
                notify(SessionUpdate {
                    state: AuthState::SignedOut,
                    error: Some(e.to_string()),
                });
                Err(e)
            }
        }
    }

    /// Fetch the profile, creating it from session metadata on first login
    async fn resolve_profile(&self, session: &Session) -> Result<Profile> {
        let user = &session.user;
        if let Some(profile) = self.profiles.get_profile(&user.id).await.map_err(bootstrap)? {
            return Ok(profile);
        }

        info!(user_id = %user.id, "no profile yet, creating one");
        match self
            .profiles
            .create_profile(user.id.clone(), user.profile_details())
            .await
        {
            Ok(_) | Err(ProfileError::AlreadyExists(_)) => {}
            Err(e) => return Err(bootstrap(e)),
        }

        // Read back what the store actually holds
        self.profiles
            .get_profile(&user.id)
            .await
            .map_err(bootstrap)?
            .ok_or_else(|| AuthError::ProfileBootstrap("profile missing after creation".to_string()))
    }
}

fn bootstrap(e: ProfileError) -> AuthError {
    AuthError::ProfileBootstrap(e.to_string())
}
