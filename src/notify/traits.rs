//! Notification sink trait and error types
//!
//! This module defines the interface the poll loop uses to announce items, and
//! the errors a delivery can end in.

use crate::notify::Notification;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering a notification
///
/// A failed send never marks the item as seen, so it is retried on the next
/// cycle if the source still returns it.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Discord returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Rate limited by Discord, retry after {retry_after:.1}s")]
    RateLimited { retry_after: f64 },

    #[error("Request to Discord timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from Discord: {0}")]
    Decode(String),

    #[error("Failed to write notification: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SendError::Timeout
        } else if e.is_decode() {
            SendError::Decode(e.to_string())
        } else {
            SendError::Network(e.to_string())
        }
    }
}

/// Result type for send operations
pub type SendResult<T> = Result<T, SendError>;

/// Trait for anything that can deliver a notification
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification
    ///
    /// Returns only after the destination accepted it, or with the reason it did not.
    async fn send(&self, notification: &Notification) -> SendResult<()>;
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    async fn send(&self, notification: &Notification) -> SendResult<()> {
        (**self).send(notification).await
    }
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    async fn send(&self, notification: &Notification) -> SendResult<()> {
        (**self).send(notification).await
    }
}
