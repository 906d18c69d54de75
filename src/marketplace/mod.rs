//! Marketplace module for finding listings
//!
//! This module contains everything needed to turn a search into items:
//! - The `ItemSource` trait the poll loop depends on
//! - Search URL construction per marketplace
//! - HTTP fetching with error classification
//! - HTML parsing of search result pages

mod fetcher;
mod parser;
mod registry;
mod search_url;
mod traits;
mod types;

pub use fetcher::{build_http_client, fetch_page};
pub use parser::{extract_item_id, fallback_id, parse_listings, parse_price};
pub use registry::{MarketplaceRegistry, MarketplaceScraper};
pub use search_url::build_search_url;
pub use traits::{FetchError, FetchResult, ItemSource};
pub use types::{Item, Marketplace, SearchParams};
