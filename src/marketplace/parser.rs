//! HTML parser for marketplace search result pages
//!
//! This module turns a search result page into [`Item`]s:
//! - One card selector and a set of field selectors per marketplace
//! - Listing ids taken from the listing URL or card attributes
//! - Price strings split into amount and currency
//!
//! Cards that lack a link (or an ASIN on Amazon) are skipped. Page order is kept.

use crate::marketplace::{Item, Marketplace};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use url::Url;

const UNKNOWN_SELLER: &str = "Unknown seller";

/// Parses a search result page into items
///
/// # Arguments
///
/// * `marketplace` - Which page layout to expect
/// * `html` - The page body
/// * `base_url` - URL the page was fetched from, for resolving relative links
/// * `limit` - Maximum number of items to return
///
/// # Example
///
/// ```
/// use marketplace_relay::marketplace::{parse_listings, Marketplace};
/// use url::Url;
///
/// let html = r#"<ul><li class="s-item">
///   <a class="s-item__link" href="https://www.ebay.com/itm/123456"></a>
///   <div class="s-item__title">Rain jacket</div>
///   <span class="s-item__price">$19.99</span>
/// </li></ul>"#;
/// let base = Url::parse("https://www.ebay.com/sch/i.html").unwrap();
/// let items = parse_listings(Marketplace::Ebay, html, &base, 10);
/// assert_eq!(items[0].id, "123456");
/// assert_eq!(items[0].price, 19.99);
/// ```
pub fn parse_listings(
    marketplace: Marketplace,
    html: &str,
    base_url: &Url,
    limit: usize,
) -> Vec<Item> {
    let document = Html::parse_document(html);

    let items = match marketplace {
        Marketplace::Ebay => parse_ebay(&document, base_url, limit),
        Marketplace::Amazon => parse_amazon(&document, base_url, limit),
        Marketplace::Vinted => parse_vinted(&document, base_url, limit),
    };

    tracing::debug!("Parsed {} {} listings", items.len(), marketplace);
    items
}

/// Parses eBay result cards (`.s-item`)
fn parse_ebay(document: &Html, base_url: &Url, limit: usize) -> Vec<Item> {
    let Ok(card_selector) = Selector::parse(".s-item") else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for card in document.select(&card_selector) {
        if items.len() >= limit {
            break;
        }

        // Placeholder card eBay puts at the top of the result list
        if card.text().collect::<String>().contains("Shop on eBay") {
            continue;
        }

        let Some(url) = attr_of(&card, ".s-item__link", "href").and_then(|h| resolve(&h, base_url))
        else {
            continue;
        };

        let id = extract_item_id(Marketplace::Ebay, &url).unwrap_or_else(|| fallback_id(&url));
        let title = text_of(&card, ".s-item__title").unwrap_or_else(|| "Unknown Title".to_string());
        let (price, currency) = text_of(&card, ".s-item__price")
            .and_then(|t| parse_price(&t, Marketplace::Ebay.default_currency()))
            .unwrap_or_else(|| (0.0, Marketplace::Ebay.default_currency().to_string()));
        let seller = text_of(&card, ".s-item__seller-info-text")
            .unwrap_or_else(|| UNKNOWN_SELLER.to_string());

        let mut item = Item::new(id, title, url, price, currency, seller);
        item.condition = text_of(&card, ".SECONDARY_INFO");
        item.shipping = text_of(&card, ".s-item__shipping");
        item.country_of_origin = text_of(&card, ".s-item__location").map(|l| strip_from_prefix(&l));
        item.image_url = image_of(&card, ".s-item__image-img");
        items.push(item);
    }

    items
}

/// Parses Amazon result cards (`[data-component-type="s-search-result"]`)
fn parse_amazon(document: &Html, base_url: &Url, limit: usize) -> Vec<Item> {
    let Ok(card_selector) = Selector::parse(r#"[data-component-type="s-search-result"]"#) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for card in document.select(&card_selector) {
        if items.len() >= limit {
            break;
        }

        let Some(asin) = card
            .value()
            .attr("data-asin")
            .map(str::trim)
            .filter(|a| !a.is_empty())
        else {
            continue;
        };

        let url = attr_of(&card, "h2 a", "href")
            .and_then(|h| resolve(&h, base_url))
            .or_else(|| resolve(&format!("/dp/{}", asin), base_url))
            .unwrap_or_default();
        let title = text_of(&card, "h2 a span")
            .or_else(|| text_of(&card, "h2 span"))
            .unwrap_or_else(|| "Unknown Title".to_string());
        let (price, currency) = text_of(&card, ".a-price .a-offscreen")
            .and_then(|t| parse_price(&t, Marketplace::Amazon.default_currency()))
            .unwrap_or_else(|| (0.0, Marketplace::Amazon.default_currency().to_string()));
        let seller = text_of(&card, ".a-row.a-size-base.a-color-secondary")
            .unwrap_or_else(|| UNKNOWN_SELLER.to_string());

        let mut item = Item::new(asin, title, url, price, currency, seller);
        item.condition = Some("New".to_string());
        item.image_url = image_of(&card, "img.s-image");
        items.push(item);
    }

    items
}

/// Parses Vinted feed cards (`.feed-grid__item`)
fn parse_vinted(document: &Html, base_url: &Url, limit: usize) -> Vec<Item> {
    let Ok(card_selector) = Selector::parse(".feed-grid__item") else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for card in document.select(&card_selector) {
        if items.len() >= limit {
            break;
        }

        let Some(url) =
            attr_of(&card, ".feed-grid__item__link", "href").and_then(|h| resolve(&h, base_url))
        else {
            continue;
        };

        let id = extract_item_id(Marketplace::Vinted, &url).unwrap_or_else(|| fallback_id(&url));
        let title =
            text_of(&card, ".feed-grid__item__title").unwrap_or_else(|| "Unknown Item".to_string());
        let (price, currency) = text_of(&card, ".feed-grid__item__price")
            .and_then(|t| parse_price(&t, Marketplace::Vinted.default_currency()))
            .unwrap_or_else(|| (0.0, Marketplace::Vinted.default_currency().to_string()));
        let seller =
            text_of(&card, ".feed-grid__item__user").unwrap_or_else(|| UNKNOWN_SELLER.to_string());

        let mut item = Item::new(id, title, url, price, currency, seller);
        item.condition = Some("Used".to_string());
        item.brand = text_of(&card, ".feed-grid__item__brand");
        item.image_url = image_of(&card, "img.feed-grid__item__photo");
        items.push(item);
    }

    items
}

/// Extracts the marketplace's own listing id from a listing URL
///
/// | Marketplace | Pattern |
/// |-------------|---------|
/// | eBay | `/itm/<digits>` or `/itm/<slug>/<digits>` |
/// | Amazon | `/dp/<ASIN>` |
/// | Vinted | `/items/<digits>` |
pub fn extract_item_id(marketplace: Marketplace, url: &str) -> Option<String> {
    static EBAY: OnceLock<Regex> = OnceLock::new();
    static AMAZON: OnceLock<Regex> = OnceLock::new();
    static VINTED: OnceLock<Regex> = OnceLock::new();

    let re = match marketplace {
        Marketplace::Ebay => EBAY.get_or_init(|| compile(r"/itm/(?:[\w-]+/)?(\d+)")),
        Marketplace::Amazon => AMAZON.get_or_init(|| compile(r"/dp/([A-Z0-9]+)")),
        Marketplace::Vinted => VINTED.get_or_init(|| compile(r"/items/(\d+)")),
    };

    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Derives a stable id from a listing URL when the marketplace id can't be found
///
/// The hash only depends on the URL, so the same listing maps to the same id on
/// every fetch and across restarts.
pub fn fallback_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Splits a price string into amount and currency
///
/// The currency is whatever precedes the first digit, or else the first word
/// after the amount, or else `default_currency`. Both `1,234.56` and `1.234,56`
/// styles are understood.
///
/// Returns `None` when the text holds no number.
pub fn parse_price(text: &str, default_currency: &str) -> Option<(f64, String)> {
    static AMOUNT: OnceLock<Regex> = OnceLock::new();
    let re = AMOUNT.get_or_init(|| compile(r"\d[\d.,\u{a0} ]*\d|\d"));

    let m = re.find(text)?;
    let amount = normalize_amount(m.as_str())?;

    let prefix = text[..m.start()].trim();
    let suffix = text[m.end()..].split_whitespace().next().unwrap_or("");
    let currency = if !prefix.is_empty() {
        prefix
    } else if !suffix.is_empty() {
        suffix
    } else {
        default_currency
    };

    Some((amount, currency.to_string()))
}

fn normalize_amount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let normalized = match (digits.rfind('.'), digits.rfind(',')) {
        // Whichever separator comes last is the decimal point
        (Some(dot), Some(comma)) if dot > comma => digits.replace(',', ""),
        (Some(_), Some(_)) => digits.replace('.', "").replace(',', "."),
        (None, Some(comma)) => {
            let decimals = digits.len() - comma - 1;
            if digits.matches(',').count() == 1 && decimals != 3 {
                digits.replace(',', ".")
            } else {
                digits.replace(',', "")
            }
        }
        (Some(_), None) if digits.matches('.').count() > 1 => digits.replace('.', ""),
        _ => digits,
    };

    normalized.parse().ok()
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => unreachable!("invalid built-in pattern {}: {}", pattern, e),
    }
}

/// Text of the first element matching `css` under `parent`, whitespace-collapsed
fn text_of(parent: &ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    parent
        .select(&selector)
        .next()
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

fn attr_of(parent: &ElementRef, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    parent
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Image source of the first matching `<img>`, only if it is an absolute HTTP(S) URL
fn image_of(parent: &ElementRef, css: &str) -> Option<String> {
    attr_of(parent, css, "src")
        .filter(|src| src.starts_with("http"))
        .or_else(|| attr_of(parent, css, "data-src").filter(|src| src.starts_with("http")))
}

/// Resolves a possibly relative href against the page URL
fn resolve(href: &str, base_url: &Url) -> Option<String> {
    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string())
}

/// Turns eBay's "from China" location label into "China"
fn strip_from_prefix(location: &str) -> String {
    let trimmed = location.trim();
    match trimmed.get(..5) {
        Some(head) if head.eq_ignore_ascii_case("from ") => trimmed[5..].trim().to_string(),
        _ => trimmed.to_string(),
    }
}
