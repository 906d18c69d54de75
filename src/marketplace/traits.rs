//! Item source trait and error types
//!
//! This module defines the interface the poll loop uses to get listings, and the
//! errors a fetch can end in.

use crate::marketplace::{Item, SearchParams};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching listings
///
/// All of them are transient from the poll loop's point of view: the cycle
/// produces no items and the next cycle tries again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Blocked by anti-scraping measures at {url} ({reason})")]
    Blocked { url: String, reason: String },

    #[error("Unexpected response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Marketplace {0} is not configured")]
    Unsupported(String),

    #[error("Invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Trait for anything that can answer a marketplace search
///
/// Implementations must return either the full result list, in the order the
/// marketplace presents it, or an error. They must not hang: every network call
/// needs a bounded timeout.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Runs one search
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>>;
}

#[async_trait]
impl<T: ItemSource + ?Sized> ItemSource for Box<T> {
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>> {
        (**self).fetch(params).await
    }
}

#[async_trait]
impl<T: ItemSource + ?Sized> ItemSource for std::sync::Arc<T> {
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>> {
        (**self).fetch(params).await
    }
}
