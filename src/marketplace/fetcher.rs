//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made against marketplaces, including:
//! - Building an HTTP client that presents itself like a regular browser
//! - GET requests for search result pages
//! - Error classification into [`FetchError`] variants

use crate::config::ScraperConfig;
use crate::marketplace::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Markers of interstitial pages served instead of search results
const BLOCK_MARKERS: [&str; 2] = ["captcha", "are you a robot"];

/// Builds an HTTP client for marketplace requests
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use marketplace_relay::config::ScraperConfig;
/// use marketplace_relay::marketplace::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a search result page and returns its body
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | HTTP 403, 429 | `Blocked` |
/// | Other non-2xx | `Http` |
/// | Timeout | `Timeout` |
/// | Body that cannot be decoded | `Parse` |
/// | Other connection or body error | `Network` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult<String> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_request_error(url, e))?;

    let status = response.status();

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::Blocked {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| {
        if e.is_decode() {
            FetchError::Parse {
                url: url.to_string(),
                message: e.to_string(),
            }
        } else {
            classify_request_error(url, e)
        }
    })
}

fn classify_request_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Looks for signs that the marketplace served a challenge page instead of results
pub(crate) fn find_block_marker(body: &str) -> Option<&'static str> {
    let lower = body.to_lowercase();
    BLOCK_MARKERS.into_iter().find(|m| lower.contains(m))
}
