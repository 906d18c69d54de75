use crate::config::types::{Config, Credentials};
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the Discord bot token
pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";

/// Environment variable holding the destination channel id
pub const ENV_CHANNEL_ID: &str = "CHANNEL_ID";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use marketplace_relay::config::load_config;
///
/// let config = load_config(Path::new("relay.toml")).unwrap();
/// println!("Interval: {}s", config.search.interval_secs);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so it is visible which configuration a running relay uses.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

impl Credentials {
    /// Reads the bot token and channel id from the process environment
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_values(
            std::env::var(ENV_DISCORD_TOKEN).ok(),
            std::env::var(ENV_CHANNEL_ID).ok(),
        )
    }

    /// Validates raw credential values
    ///
    /// The token must be non-empty and the channel id a non-zero integer.
    pub fn from_values(
        token: Option<String>,
        channel_id: Option<String>,
    ) -> ConfigResult<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnv(ENV_DISCORD_TOKEN))?;

        let raw_channel = channel_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingEnv(ENV_CHANNEL_ID))?;

        let channel_id = raw_channel
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| ConfigError::InvalidEnv {
                name: ENV_CHANNEL_ID,
                value: raw_channel.clone(),
            })?;

        Ok(Self { token, channel_id })
    }
}
