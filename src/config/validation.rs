use crate::config::types::{
    Config, DiscordConfig, MarketplacesConfig, ScraperConfig, SearchDefaults,
};
use crate::marketplace::Marketplace;
use crate::state::SearchConfig;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_discord_config(&config.discord)?;
    build_search_config(&config.search)?;
    validate_scraper_config(&config.scraper)?;
    validate_marketplaces(&config.marketplaces)?;
    Ok(())
}

/// Turns the `[search]` section into the live search configuration
///
/// Uses the same rules as the runtime commands, so a config file can't start the
/// relay in a state no command could have produced.
pub fn build_search_config(defaults: &SearchDefaults) -> Result<SearchConfig, ConfigError> {
    let mut search = SearchConfig::new();

    if let Some(keyword) = &defaults.keyword {
        search.set_keyword(keyword)?;
    }
    search.set_price_range(defaults.price_min, defaults.price_max)?;
    search.set_interval(defaults.interval_secs)?;
    search.set_marketplace(defaults.marketplace);
    search.set_per_page(defaults.per_page)?;

    Ok(search)
}

/// Validates Discord configuration
fn validate_discord_config(config: &DiscordConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api-base: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "api-base must be an HTTP(S) URL, got '{}'",
            config.api_base
        )));
    }

    if config.command_poll_ms < 500 {
        return Err(ConfigError::Validation(format!(
            "command-poll-ms must be >= 500ms, got {}ms",
            config.command_poll_ms
        )));
    }

    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 120, got {}",
            config.timeout_secs
        )));
    }

    if config.send_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "send-delay-ms must be <= 60000ms, got {}ms",
            config.send_delay_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates marketplace base URLs
fn validate_marketplaces(config: &MarketplacesConfig) -> Result<(), ConfigError> {
    for marketplace in Marketplace::ALL {
        let base = config.base_url(marketplace);
        let url = Url::parse(base).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", marketplace, base, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "{} URL '{}' must use HTTP(S)",
                marketplace, base
            )));
        }
    }

    Ok(())
}
