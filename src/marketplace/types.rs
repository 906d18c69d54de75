use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Supported marketplaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    Ebay,
    Amazon,
    Vinted,
}

impl Marketplace {
    /// Every marketplace, in the order they are listed to users
    pub const ALL: [Marketplace; 3] = [Self::Ebay, Self::Amazon, Self::Vinted];

    /// Lowercase name used in commands and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ebay => "ebay",
            Self::Amazon => "amazon",
            Self::Vinted => "vinted",
        }
    }

    /// Currency assumed when a price string carries no symbol
    pub fn default_currency(&self) -> &'static str {
        match self {
            Self::Ebay | Self::Amazon => "$",
            Self::Vinted => "PLN",
        }
    }

    /// Comma-separated list of all marketplace names
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marketplace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownMarketplace {
                name,
                available: Self::available(),
            })
    }
}

/// A single marketplace listing
///
/// Items are produced by an [`ItemSource`](super::ItemSource), checked against the
/// seen set, maybe announced, and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Dedup key, stable across repeated fetches of the same listing
    pub id: String,
    pub title: String,
    pub url: String,
    pub price: f64,
    pub currency: String,
    pub seller_name: String,
    pub image_url: Option<String>,
    pub country_of_origin: Option<String>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
    pub brand: Option<String>,
}

impl Item {
    /// Creates an item with the required fields and no optional details
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
        seller_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            price,
            currency: currency.into(),
            seller_name: seller_name.into(),
            image_url: None,
            country_of_origin: None,
            condition: None,
            shipping: None,
            brand: None,
        }
    }
}

/// Parameters for one marketplace search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub keyword: String,
    pub price_min: f64,
    pub price_max: f64,
    pub marketplace: Marketplace,
    pub page_size: u32,
}
