//! Hosted auth service speaking the GoTrue REST protocol.
//!
//! Wire types stay private to this module. Session events are published
//! locally after each successful call, the same way the mock backend does.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use super::{
    AuthBackend, AuthError, AuthEvent, AuthEventKind, Credentials, Result, Session, SessionHub,
    SessionUser, SignUpMetadata,
};
use crate::profile::UserId;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct RemoteAuthBackend {
    client: Client,
    base_url: String,
    api_key: String,
    hub: SessionHub,
}

impl RemoteAuthBackend {
    /// `base_url` is the auth root, e.g. `https://<project>.example.co/auth/v1`
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            hub: SessionHub::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .post(self.url(path))
            .header("apikey", &self.api_key)
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(path, error = %e, "auth request failed (transport)");
            AuthError::Backend(format!("network error: {e}"))
        })?;
        check_status(response).await
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a SignUpMetadata,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: SignUpMetadata,
}

impl WireUser {
    fn into_session_user(self, fallback_email: &str) -> SessionUser {
        SessionUser {
            id: UserId::from_string(self.id),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            metadata: self.user_metadata,
        }
    }
}

/// Sign-up returns the bare user when confirmation is pending and a token
/// envelope when the account is confirmed immediately
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Token(TokenResponse),
    User(WireUser),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorEnvelope {
    fn text(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

fn map_error(status: StatusCode, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(ErrorEnvelope::text)
        .unwrap_or_else(|| body.to_string());

    if message.to_lowercase().contains("already registered") {
        return AuthError::AlreadyRegistered(message);
    }
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            AuthError::InvalidCredentials(message)
        }
        _ => AuthError::Backend(format!("HTTP {status}: {message}")),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    let err = map_error(status, &body);
    warn!(%status, error = %err, "auth request returned HTTP error");
    Err(err)
}

fn malformed(e: reqwest::Error) -> AuthError {
    AuthError::Backend(format!("failed to parse auth response: {e}"))
}

#[async_trait]
impl AuthBackend for RemoteAuthBackend {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: SignUpMetadata,
    ) -> Result<UserId> {
        let body = SignUpRequest {
            email: credentials.email.trim(),
            password: &credentials.password,
            data: &metadata,
        };
        let response = self.post("signup", &body, None).await?;
        let user = match response.json::<SignUpResponse>().await.map_err(malformed)? {
            SignUpResponse::Token(token) => token.user,
            SignUpResponse::User(user) => user,
        };
        debug!(user_id = %user.id, "registered account");
        Ok(UserId::from_string(user.id))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let email = credentials.email.trim();
        let body = PasswordGrant {
            email,
            password: &credentials.password,
        };
        let response = self
            .post("token?grant_type=password", &body, None)
            .await?;
        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(malformed)?;

        let session = Session {
            access_token: Some(token.access_token),
            user: token.user.into_session_user(email),
        };
        self.hub
            .publish(AuthEventKind::SignedIn, Some(session.clone()))
            .await;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self
            .hub
            .current()
            .await
            .and_then(|session| session.access_token);

        // The local session is dropped even if the server call fails
        let result = match token.as_deref() {
            Some(token) => self
                .post("logout", &serde_json::json!({}), Some(token))
                .await
                .map(|_| ()),
            None => Ok(()),
        };
        self.hub.publish(AuthEventKind::SignedOut, None).await;
        result
    }

    async fn current_session(&self) -> Option<Session> {
        self.hub.current().await
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.hub.subscribe()
    }
}
