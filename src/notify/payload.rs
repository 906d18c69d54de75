use crate::marketplace::Item;

/// Longest title a notification carries, in characters
pub const MAX_TITLE_CHARS: usize = 256;

/// A formatted announcement for one item
///
/// Everything a sink needs to render the item, already trimmed to display limits.
/// Sinks decide the layout; this type only decides the content.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Id of the announced item
    pub item_id: String,
    pub title: String,
    pub url: String,
    /// Price with currency, e.g. `129.99 $`
    pub price: String,
    pub seller: String,
    pub country: Option<String>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
    pub brand: Option<String>,
    /// Only set for `http(s)` image URLs
    pub image_url: Option<String>,
}

/// A labelled detail line of a notification
#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

impl Notification {
    /// Builds the notification for an item
    pub fn from_item(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            title: truncate(&format!("🛍️ {}", item.title.trim()), MAX_TITLE_CHARS),
            url: item.url.clone(),
            price: format!("{} {}", format_amount(item.price), item.currency),
            seller: item.seller_name.clone(),
            country: non_empty(&item.country_of_origin),
            condition: non_empty(&item.condition),
            shipping: non_empty(&item.shipping),
            brand: non_empty(&item.brand),
            image_url: item
                .image_url
                .as_ref()
                .filter(|url| is_http_url(url))
                .cloned(),
        }
    }

    /// Body text: price, then condition and brand when known
    pub fn description(&self) -> String {
        let mut lines = vec![format!("💰 Price: {}", self.price)];
        if let Some(condition) = &self.condition {
            lines.push(format!("📦 Condition: {}", condition));
        }
        if let Some(brand) = &self.brand {
            lines.push(format!("🏷️ Brand: {}", brand));
        }
        lines.join("\n")
    }

    /// Labelled details shown below the body
    pub fn fields(&self) -> Vec<DetailField> {
        let mut fields = vec![DetailField {
            name: "Seller",
            value: format!("👤 {}", self.seller),
            inline: false,
        }];

        if let Some(country) = &self.country {
            fields.push(DetailField {
                name: "Location",
                value: format!("📍 {}", country),
                inline: true,
            });
        }

        if let Some(shipping) = &self.shipping {
            fields.push(DetailField {
                name: "Shipping",
                value: format!("🚚 {}", shipping),
                inline: true,
            });
        }

        fields
    }
}

/// Formats an amount without decimals when it is whole, with two otherwise
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with `…`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
