//! Marketplace scraping against a mock marketplace

use marketplace_relay::config::{MarketplacesConfig, ScraperConfig};
use marketplace_relay::marketplace::{
    build_http_client, FetchError, MarketplaceRegistry, MarketplaceScraper,
};
use marketplace_relay::{ItemSource, Marketplace, SearchParams};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"
    <html><body><ul class="srp-results">
      <li class="s-item">
        <div class="s-item__title">Shop on eBay</div>
        <a class="s-item__link" href="https://ebay.com/itm/123456"></a>
      </li>
      <li class="s-item">
        <a class="s-item__link" href="/itm/denim-jacket/1111111111"></a>
        <div class="s-item__title">Denim Jacket</div>
        <span class="s-item__price">$30.00</span>
        <span class="s-item__location">from Germany</span>
      </li>
      <li class="s-item">
        <a class="s-item__link" href="/itm/rain-jacket/2222222222"></a>
        <div class="s-item__title">Rain Jacket</div>
        <span class="s-item__price">$1,049.50</span>
      </li>
    </ul></body></html>
"#;

const CAPTCHA_PAGE: &str = r#"
    <html><body>
      <h1>Please verify you are not a robot</h1>
      <div id="captcha"></div>
    </body></html>
"#;

fn params(page_size: u32) -> SearchParams {
    SearchParams {
        keyword: "jacket".to_string(),
        price_min: 10.0,
        price_max: 2000.0,
        marketplace: Marketplace::Ebay,
        page_size,
    }
}

fn scraper(server: &MockServer) -> MarketplaceScraper {
    let client = build_http_client(&ScraperConfig::default()).unwrap();
    MarketplaceScraper::new(Marketplace::Ebay, Url::parse(&server.uri()).unwrap(), client)
}

#[tokio::test]
async fn test_scrape_ebay_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_nkw", "jacket"))
        .and(query_param("_udlo", "10"))
        .and(query_param("_udhi", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let items = scraper(&server).fetch(&params(10)).await.unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1111111111", "2222222222"]);
    assert_eq!(items[0].url, format!("{}/itm/denim-jacket/1111111111", server.uri()));
    assert_eq!(items[0].country_of_origin.as_deref(), Some("Germany"));
    assert_eq!(items[1].price, 1049.5);
}

#[tokio::test]
async fn test_page_size_limits_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .mount(&server)
        .await;

    let items = scraper(&server).fetch(&params(1)).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Denim Jacket");
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = scraper(&server).fetch(&params(10)).await;
    assert!(matches!(result, Err(FetchError::Http { status: 503, .. })));
}

#[tokio::test]
async fn test_forbidden_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = scraper(&server).fetch(&params(10)).await;
    assert!(matches!(result, Err(FetchError::Blocked { .. })));
}

#[tokio::test]
async fn test_captcha_page_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CAPTCHA_PAGE))
        .mount(&server)
        .await;

    let result = scraper(&server).fetch(&params(10)).await;
    assert!(matches!(result, Err(FetchError::Blocked { .. })));
}

#[tokio::test]
async fn test_registry_routes_by_marketplace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .and(query_param("search_text", "jacket"))
        .and(query_param("order", "newest_first"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let marketplaces = MarketplacesConfig {
        vinted: server.uri(),
        ..MarketplacesConfig::default()
    };
    let registry =
        MarketplaceRegistry::from_config(&ScraperConfig::default(), &marketplaces).unwrap();

    let mut params = params(10);
    params.marketplace = Marketplace::Vinted;
    let items = registry.fetch(&params).await.unwrap();
    assert!(items.is_empty());
}
