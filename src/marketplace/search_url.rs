use crate::marketplace::{FetchResult, Marketplace, SearchParams};
use url::Url;

/// Builds the search page URL for a marketplace
///
/// | Marketplace | Path | Query |
/// |-------------|------|-------|
/// | eBay | `/sch/i.html` | `_nkw`, `_udlo`, `_udhi` |
/// | Amazon | `/s` | `k`, `price=<min>-<max>` |
/// | Vinted | `/catalog` | `search_text`, `price_from`, `price_to`, `order=newest_first` |
///
/// # Arguments
///
/// * `base_url` - Marketplace root, e.g. `https://www.ebay.com`
/// * `params` - The search to run
///
/// # Example
///
/// ```
/// use marketplace_relay::marketplace::{build_search_url, Marketplace, SearchParams};
/// use url::Url;
///
/// let params = SearchParams {
///     keyword: "rain jacket".to_string(),
///     price_min: 0.0,
///     price_max: 50.0,
///     marketplace: Marketplace::Ebay,
///     page_size: 10,
/// };
/// let base = Url::parse("https://www.ebay.com").unwrap();
/// let url = build_search_url(&base, &params).unwrap();
/// assert_eq!(url.path(), "/sch/i.html");
/// ```
pub fn build_search_url(base_url: &Url, params: &SearchParams) -> FetchResult<Url> {
    let price_from = format_price(params.price_min);
    let price_to = format_price(params.price_max);

    let url = match params.marketplace {
        Marketplace::Ebay => {
            let mut url = base_url.join("/sch/i.html")?;
            url.query_pairs_mut()
                .append_pair("_nkw", &params.keyword)
                .append_pair("_udlo", &price_from)
                .append_pair("_udhi", &price_to);
            url
        }
        Marketplace::Amazon => {
            let mut url = base_url.join("/s")?;
            url.query_pairs_mut()
                .append_pair("k", &params.keyword)
                .append_pair("price", &format!("{}-{}", price_from, price_to));
            url
        }
        Marketplace::Vinted => {
            let mut url = base_url.join("/catalog")?;
            url.query_pairs_mut()
                .append_pair("search_text", &params.keyword)
                .append_pair("price_from", &price_from)
                .append_pair("price_to", &price_to)
                .append_pair("order", "newest_first")
                .append_pair("per_page", &params.page_size.to_string());
            url
        }
    };

    Ok(url)
}

/// Formats a price bound without a trailing `.0` for whole numbers
fn format_price(value: f64) -> String {
    format!("{}", value)
}
