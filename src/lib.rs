//! Marketplace-Relay: a marketplace listing notifier
//!
//! This crate polls a marketplace search for listings matching a keyword and price
//! range, and posts every listing it has not announced before to a Discord channel.
//! The search is reconfigured at runtime through text commands in the same channel.

pub mod command;
pub mod config;
pub mod discord;
pub mod marketplace;
pub mod notify;
pub mod poller;
pub mod state;

use thiserror::Error;

/// Main error type for Marketplace-Relay operations
///
/// Every variant is fatal: per-cycle failures are contained inside the poll loop
/// and never surface as a `RelayError`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Discord error: {0}")]
    Discord(#[from] notify::SendError),
}

/// Configuration errors
///
/// Covers both the startup configuration (file and environment) and the values
/// users submit through commands. The `Display` text of the runtime variants is
/// shown to users as-is.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("{0} not found in environment variables")]
    MissingEnv(&'static str),

    #[error("{name} has an invalid value: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Please provide a valid keyword.")]
    EmptyKeyword,

    #[error("'{value}' is not a valid {field}.")]
    NotANumber { field: &'static str, value: String },

    #[error("Prices must not be negative.")]
    NegativePrice,

    #[error("Invalid price range: min ({min}) is greater than max ({max}).")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("Interval must be at least {min} seconds, got {got}.")]
    IntervalTooShort { min: u64, got: String },

    #[error("Interval must be at most {max} seconds, got {got}.")]
    IntervalTooLong { max: u64, got: String },

    #[error("Unknown marketplace '{name}'. Available options: {available}")]
    UnknownMarketplace { name: String, available: String },
}

/// Result type alias for Marketplace-Relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use command::{CommandRouter, Reply};
pub use config::{Config, Credentials};
pub use marketplace::{Item, ItemSource, Marketplace, SearchParams};
pub use notify::{Notification, NotificationSink};
pub use poller::PollLoop;
pub use state::{RelayState, SearchConfig, SeenSet};
