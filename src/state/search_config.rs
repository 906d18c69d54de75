use crate::marketplace::{Marketplace, SearchParams};
use crate::ConfigError;
use std::time::Duration;

/// Shortest allowed poll interval in seconds
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Longest allowed poll interval in seconds
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Fields of the search configuration that can be set from text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Free-text keyword
    Keyword,
    /// Two whitespace-separated numbers: `<min> <max>`
    PriceRange,
    /// Poll interval in whole seconds
    Interval,
    /// Marketplace name
    Marketplace,
}

/// The live search configuration
///
/// Written by the command router, read by the poll loop through [`snapshot`](Self::snapshot)
/// once per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    keyword: Option<String>,
    price_min: f64,
    price_max: f64,
    interval_secs: u64,
    marketplace: Marketplace,
    per_page: u32,
}

impl Default for SearchConfig {
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

impl SearchConfig {
    /// Creates a configuration with no keyword and default bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field from its textual form
    ///
    /// This is the entry point for values coming from user commands; the typed
    /// setters below apply the same validation.
    pub fn set(&mut self, field: SearchField, value: &str) -> Result<(), ConfigError> {
        match field {
            SearchField::Keyword => self.set_keyword(value),
            SearchField::PriceRange => {
                let parts: Vec<&str> = value.split_whitespace().collect();
                let [min, max] = parts.as_slice() else {
                    return Err(ConfigError::Validation(
                        "Format: !set_price <min> <max>".to_string(),
                    ));
                };
                let min = parse_price(min)?;
                let max = parse_price(max)?;
                self.set_price_range(min, max)
            }
            SearchField::Interval => {
                let value = value.trim();
                match value.parse::<u64>() {
                    Ok(secs) => self.set_interval(secs),
                    // Integers u64 can't hold are still out of range, not malformed
                    Err(_) if is_integer(value) && value.starts_with('-') => {
                        Err(ConfigError::IntervalTooShort {
                            min: MIN_INTERVAL_SECS,
                            got: value.to_string(),
                        })
                    }
                    Err(_) if is_integer(value) => Err(ConfigError::IntervalTooLong {
                        max: MAX_INTERVAL_SECS,
                        got: value.to_string(),
                    }),
                    Err(_) => Err(ConfigError::NotANumber {
                        field: "number of seconds",
                        value: value.to_string(),
                    }),
                }
            }
            SearchField::Marketplace => {
                self.marketplace = value.parse()?;
                Ok(())
            }
        }
    }

    /// Sets the search keyword; surrounding whitespace is trimmed
    pub fn set_keyword(&mut self, keyword: &str) -> Result<(), ConfigError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ConfigError::EmptyKeyword);
        }
        self.keyword = Some(keyword.to_string());
        Ok(())
    }

    /// Sets both price bounds at once
    pub fn set_price_range(&mut self, min: f64, max: f64) -> Result<(), ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::Validation(
                "Prices must be finite numbers.".to_string(),
            ));
        }
        if min < 0.0 || max < 0.0 {
            return Err(ConfigError::NegativePrice);
        }
        if min > max {
            return Err(ConfigError::InvertedPriceRange { min, max });
        }
        self.price_min = min;
        self.price_max = max;
        Ok(())
    }

    /// Sets the poll interval; must lie within `[10, 3600]` seconds
    pub fn set_interval(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs < MIN_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooShort {
                min: MIN_INTERVAL_SECS,
                got: secs.to_string(),
            });
        }
        if secs > MAX_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooLong {
                max: MAX_INTERVAL_SECS,
                got: secs.to_string(),
            });
        }
        self.interval_secs = secs;
        Ok(())
    }

    pub fn set_marketplace(&mut self, marketplace: Marketplace) {
        self.marketplace = marketplace;
    }

    /// Sets how many results are requested per search
    pub fn set_per_page(&mut self, per_page: u32) -> Result<(), ConfigError> {
        if per_page == 0 || per_page > 100 {
            return Err(ConfigError::Validation(format!(
                "per_page must be between 1 and 100, got {}",
                per_page
            )));
        }
        self.per_page = per_page;
        Ok(())
    }

    /// Returns a copy of the configuration for the duration of one cycle
    pub fn snapshot(&self) -> SearchConfig {
        self.clone()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn price_min(&self) -> f64 {
        self.price_min
    }

    pub fn price_max(&self) -> f64 {
        self.price_max
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Builds source parameters, or `None` when no search is active
    pub fn search_params(&self) -> Option<SearchParams> {
        let keyword = self.keyword.as_ref()?;
        Some(SearchParams {
            keyword: keyword.clone(),
            price_min: self.price_min,
            price_max: self.price_max,
            marketplace: self.marketplace,
            page_size: self.per_page,
        })
    }
}

/// Optional sign followed by at least one digit
fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_price(value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::NotANumber {
        field: "price",
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::new();
        assert_eq!(config.keyword(), None);
        assert_eq!(config.price_min(), 0.0);
        assert_eq!(config.price_max(), 100.0);
        assert_eq!(config.interval_secs(), 60);
        assert_eq!(config.marketplace(), Marketplace::Ebay);
        assert!(config.search_params().is_none());
    }

    #[test]
    fn test_keyword_is_trimmed() {
        let mut config = SearchConfig::new();
        config.set(SearchField::Keyword, "  winter jacket ").unwrap();
        assert_eq!(config.keyword(), Some("winter jacket"));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut config = SearchConfig::new();
        config.set_keyword("jacket").unwrap();
        let result = config.set(SearchField::Keyword, "   ");
        assert!(matches!(result, Err(ConfigError::EmptyKeyword)));
        assert_eq!(config.keyword(), Some("jacket"));
    }

    #[test]
    fn test_interval_bounds() {
        let mut config = SearchConfig::new();

        let result = config.set(SearchField::Interval, "5");
        assert!(matches!(
            result,
            Err(ConfigError::IntervalTooShort { min: 10, ref got }) if got == "5"
        ));

        let result = config.set(SearchField::Interval, "3601");
        assert!(matches!(
            result,
            Err(ConfigError::IntervalTooLong { max: 3600, ref got }) if got == "3601"
        ));

        config.set(SearchField::Interval, "60").unwrap();
        assert_eq!(config.interval_secs(), 60);

        config.set(SearchField::Interval, "10").unwrap();
        config.set(SearchField::Interval, "3600").unwrap();
        assert_eq!(config.interval_secs(), 3600);
    }

    #[test]
    fn test_interval_out_of_integer_range() {
        let mut config = SearchConfig::new();

        let result = config.set(SearchField::Interval, "-5");
        assert!(matches!(
            result,
            Err(ConfigError::IntervalTooShort { min: 10, ref got }) if got == "-5"
        ));
        assert!(result.unwrap_err().to_string().contains("at least 10 seconds"));

        let result = config.set(SearchField::Interval, "99999999999999999999999");
        assert!(matches!(
            result,
            Err(ConfigError::IntervalTooLong { max: 3600, .. })
        ));
        assert!(result.unwrap_err().to_string().contains("at most 3600 seconds"));

        assert!(matches!(
            config.set(SearchField::Interval, "-"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert_eq!(config.interval_secs(), 60);
    }

    #[test]
    fn test_interval_must_be_integer() {
        let mut config = SearchConfig::new();
        assert!(matches!(
            config.set(SearchField::Interval, "ten"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            config.set(SearchField::Interval, "12.5"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert_eq!(config.interval_secs(), 60);
    }

    #[test]
    fn test_price_range() {
        let mut config = SearchConfig::new();

        let result = config.set(SearchField::PriceRange, "50 10");
        assert!(matches!(
            result,
            Err(ConfigError::InvertedPriceRange { .. })
        ));
        assert_eq!(config.price_max(), 100.0);

        config.set(SearchField::PriceRange, "10 50").unwrap();
        assert_eq!(config.price_min(), 10.0);
        assert_eq!(config.price_max(), 50.0);

        config.set(SearchField::PriceRange, "20 20").unwrap();
        assert_eq!(config.price_min(), 20.0);
    }

    #[test]
    fn test_price_range_rejects_bad_input() {
        let mut config = SearchConfig::new();
        assert!(matches!(
            config.set(SearchField::PriceRange, "abc 10"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            config.set(SearchField::PriceRange, "-1 10"),
            Err(ConfigError::NegativePrice)
        ));
        assert!(matches!(
            config.set(SearchField::PriceRange, "10"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set(SearchField::PriceRange, "1 2 3"),
            Err(ConfigError::Validation(_))
        ));
        assert!(config.set(SearchField::PriceRange, "NaN 10").is_err());
    }

    #[test]
    fn test_set_marketplace() {
        let mut config = SearchConfig::new();
        config.set(SearchField::Marketplace, "Vinted").unwrap();
        assert_eq!(config.marketplace(), Marketplace::Vinted);
        assert!(matches!(
            config.set(SearchField::Marketplace, "etsy"),
            Err(ConfigError::UnknownMarketplace { .. })
        ));
        assert_eq!(config.marketplace(), Marketplace::Vinted);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut config = SearchConfig::new();
        config.set_interval(30).unwrap();
        let snapshot = config.snapshot();
        config.set_interval(120).unwrap();
        assert_eq!(snapshot.interval_secs(), 30);
        assert_eq!(config.interval_secs(), 120);
    }

    #[test]
    fn test_search_params() {
        let mut config = SearchConfig::new();
        config.set_keyword("jacket").unwrap();
        config.set_price_range(5.0, 25.5).unwrap();
        let params = config.search_params().unwrap();
        assert_eq!(params.keyword, "jacket");
        assert_eq!(params.price_min, 5.0);
        assert_eq!(params.price_max, 25.5);
        assert_eq!(params.page_size, 10);
    }
}
