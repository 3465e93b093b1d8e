//! Transient in-app notifications, such as "Topic complete! +10 points".

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub icon: Option<String>,
    pub created_at: Instant,
}

impl Notification {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= NOTIFICATION_TTL
    }
}

/// Holds the most recent notification; a new one replaces the old
#[derive(Clone, Default)]
pub struct NotificationCenter {
    latest: Arc<RwLock<Option<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn notify(&self, message: impl Into<String>, icon: Option<&str>) {
        let notification = Notification {
            message: message.into(),
            icon: icon.map(String::from),
            created_at: Instant::now(),
        };
        *self.latest.write().await = Some(notification);
    }

    /// The latest notification, unless it has expired
    pub async fn current(&self) -> Option<Notification> {
        let mut latest = self.latest.write().await;
        if latest.as_ref().is_some_and(Notification::is_expired) {
            *latest = None;
        }
        latest.clone()
    }

    pub async fn dismiss(&self) {
        *self.latest.write().await = None;
    }
}
