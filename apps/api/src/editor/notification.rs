use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a notification stays visible before it expires on its own.
const NOTIFICATION_TTL_MS: i64 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A transient user-facing message with a self-expiring lifetime.
///
/// Expiry is lazy: there is no timer task, the value is simply dropped
/// the next time it is read after `expires_at`. At most one notification
/// exists per session; a newer one preempts an unexpired one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::with_expiry(NotificationKind::Success, message, Utc::now())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Notification::with_expiry(NotificationKind::Failure, message, Utc::now())
    }

    fn with_expiry(kind: NotificationKind, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Notification {
            kind,
            message: message.into(),
            expires_at: now + Duration::milliseconds(NOTIFICATION_TTL_MS),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
