//! Configuration module for Marketplace-Relay
//!
//! This module handles the startup configuration: an optional TOML file with
//! search defaults and HTTP settings, and the Discord credentials taken from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use marketplace_relay::config::{load_config, Credentials};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("relay.toml")).unwrap();
//! let credentials = Credentials::from_env().unwrap();
//! println!("Posting to channel {}", credentials.channel_id);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, Credentials, DiscordConfig, MarketplacesConfig, ScraperConfig, SearchDefaults,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, ENV_CHANNEL_ID,
    ENV_DISCORD_TOKEN,
};
pub use validation::{build_search_config, validate};
