//! Marketplace scrapers
//!
//! A [`MarketplaceScraper`] searches one marketplace; a [`MarketplaceRegistry`]
//! holds one scraper per configured marketplace and routes each search to the
//! marketplace named in its parameters.

use crate::config::{MarketplacesConfig, ScraperConfig};
use crate::marketplace::fetcher::{fetch_page, find_block_marker};
use crate::marketplace::{
    build_http_client, build_search_url, parse_listings, FetchError, FetchResult, Item,
    ItemSource, Marketplace, SearchParams,
};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use url::Url;

/// Scrapes the search result pages of a single marketplace
#[derive(Debug, Clone)]
pub struct MarketplaceScraper {
    marketplace: Marketplace,
    base_url: Url,
    client: Client,
}

impl MarketplaceScraper {
    pub fn new(marketplace: Marketplace, base_url: Url, client: Client) -> Self {
        tracing::info!("Initialized scraper for {} at {}", marketplace, base_url);
        Self {
            marketplace,
            base_url,
            client,
        }
    }

    pub fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ItemSource for MarketplaceScraper {
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>> {
        let search_url = build_search_url(&self.base_url, params)?;
        tracing::info!(
            "Searching for '{}' on {} ({} - {})",
            params.keyword,
            self.marketplace,
            params.price_min,
            params.price_max
        );

        let body = fetch_page(&self.client, search_url.as_str()).await?;
        let items = parse_listings(
            self.marketplace,
            &body,
            &search_url,
            params.page_size as usize,
        );

        // A challenge page parses to nothing; report it rather than "no results"
        if items.is_empty() {
            if let Some(marker) = find_block_marker(&body) {
                return Err(FetchError::Blocked {
                    url: search_url.to_string(),
                    reason: format!("page contains '{}'", marker),
                });
            }
        }

        Ok(items)
    }
}

/// One scraper per marketplace, selected by [`SearchParams::marketplace`]
#[derive(Debug, Clone, Default)]
pub struct MarketplaceRegistry {
    scrapers: HashMap<Marketplace, MarketplaceScraper>,
}

impl MarketplaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry covering every marketplace with a configured base URL
    ///
    /// All scrapers share a single HTTP client.
    ///
    /// # Arguments
    ///
    /// * `scraper` - HTTP client settings
    /// * `marketplaces` - Base URL per marketplace
    pub fn from_config(
        scraper: &ScraperConfig,
        marketplaces: &MarketplacesConfig,
    ) -> crate::Result<Self> {
        let client = build_http_client(scraper)?;
        let mut registry = Self::new();

        for marketplace in Marketplace::ALL {
            let base = marketplaces.base_url(marketplace);
            let base_url = Url::parse(base).map_err(|e| {
                crate::ConfigError::InvalidUrl(format!(
                    "{} base URL '{}': {}",
                    marketplace, base, e
                ))
            })?;
            registry.register(MarketplaceScraper::new(marketplace, base_url, client.clone()));
        }

        Ok(registry)
    }

    /// Adds or replaces the scraper for its marketplace
    pub fn register(&mut self, scraper: MarketplaceScraper) {
        self.scrapers.insert(scraper.marketplace(), scraper);
    }

    pub fn get(&self, marketplace: Marketplace) -> Option<&MarketplaceScraper> {
        self.scrapers.get(&marketplace)
    }

    pub fn len(&self) -> usize {
        self.scrapers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scrapers.is_empty()
    }
}

#[async_trait]
impl ItemSource for MarketplaceRegistry {
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>> {
        let scraper = self
            .get(params.marketplace)
            .ok_or_else(|| FetchError::Unsupported(params.marketplace.to_string()))?;
        scraper.fetch(params).await
    }
}
