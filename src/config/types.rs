use crate::marketplace::Marketplace;
use serde::Deserialize;

/// Main configuration structure for Marketplace-Relay
///
/// Every section has defaults, so an empty file (or no file at all) is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discord: DiscordConfig,
    pub search: SearchDefaults,
    pub scraper: ScraperConfig,
    pub marketplaces: MarketplacesConfig,
}

/// Discord connection behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Root of the Discord REST API
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// How often the channel is checked for new commands (milliseconds)
    #[serde(rename = "command-poll-ms")]
    pub command_poll_ms: u64,

    /// Post a greeting to the channel on startup
    #[serde(rename = "announce-startup")]
    pub announce_startup: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            command_poll_ms: 2000,
            announce_startup: true,
        }
    }
}

/// Search settings in effect when the relay starts
///
/// They can all be changed at runtime through commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Initial keyword; without one the relay idles until `!set_keyword`
    pub keyword: Option<String>,

    #[serde(rename = "price-min")]
    pub price_min: f64,

    #[serde(rename = "price-max")]
    pub price_max: f64,

    /// Seconds between poll cycles
    #[serde(rename = "interval-secs")]
    pub interval_secs: u64,

    pub marketplace: Marketplace,

    /// Results requested per search
    #[serde(rename = "per-page")]
    pub per_page: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            keyword: None,
            price_min: 0.0,
            price_max: 100.0,
            interval_secs: 60,
            marketplace: Marketplace::default(),
            per_page: 10,
        }
    }
}

/// HTTP behavior for marketplace requests and notification pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Fixed pause between two consecutive notifications (milliseconds)
    #[serde(rename = "send-delay-ms")]
    pub send_delay_ms: u64,

    /// User-Agent header sent to marketplaces
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            send_delay_ms: 1000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Base URL of each marketplace
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplacesConfig {
    pub ebay: String,
    pub amazon: String,
    pub vinted: String,
}

impl Default for MarketplacesConfig {
    fn default() -> Self {
        Self {
            ebay: "https://www.ebay.com".to_string(),
            amazon: "https://www.amazon.com".to_string(),
            vinted: "https://www.vinted.pl".to_string(),
        }
    }
}

impl MarketplacesConfig {
    pub fn base_url(&self, marketplace: Marketplace) -> &str {
        match marketplace {
            Marketplace::Ebay => &self.ebay,
            Marketplace::Amazon => &self.amazon,
            Marketplace::Vinted => &self.vinted,
        }
    }
}

/// Discord bot credentials, taken from the environment
#[derive(Clone)]
pub struct Credentials {
    /// Bot token (`DISCORD_TOKEN`)
    pub token: String,

    /// Channel the relay posts to and reads commands from (`CHANNEL_ID`)
    pub channel_id: u64,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}
