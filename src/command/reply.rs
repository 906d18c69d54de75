use crate::marketplace::Marketplace;
use crate::notify::{format_amount, DetailField};
use crate::state::{PollStats, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

pub const HELP_TITLE: &str = "🤖 Marketplace Bot Help";
pub const STATUS_TITLE: &str = "🔍 Current Search Configuration";

/// Answer to a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Confirmation of a successful change
    Text(String),

    /// The command was rejected; the message says why
    Error(String),

    /// List of available commands
    Help,

    /// Current configuration and poll statistics
    Status(StatusReport),
}

/// Everything `!status` reports
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub keyword: Option<String>,
    pub price_min: f64,
    pub price_max: f64,
    pub marketplace: Marketplace,
    pub interval_secs: u64,
    pub per_page: u32,
    pub tracked_items: usize,
    pub cycles: u64,
    pub notifications_sent: u64,
    pub last_check: Option<String>,
    pub last_error: Option<String>,
    pub phase: String,
}

impl StatusReport {
    pub fn new(
        search: &crate::state::SearchConfig,
        tracked_items: usize,
        stats: &PollStats,
    ) -> Self {
        Self {
            keyword: search.keyword().map(str::to_string),
            price_min: search.price_min(),
            price_max: search.price_max(),
            marketplace: search.marketplace(),
            interval_secs: search.interval_secs(),
            per_page: search.per_page(),
            tracked_items,
            cycles: stats.cycles,
            notifications_sent: stats.notifications_sent,
            last_check: stats
                .last_cycle_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            last_error: stats.last_error.clone(),
            phase: stats.phase.to_string(),
        }
    }

    pub fn fields(&self) -> Vec<DetailField> {
        let mut fields = vec![
            field(
                "Keyword",
                self.keyword.as_deref().unwrap_or("Not set"),
                false,
            ),
            field(
                "Price Range",
                &format_price_range(self.price_min, self.price_max, self.marketplace),
                true,
            ),
            field("Marketplace", self.marketplace.as_str(), true),
            field(
                "Check Interval",
                &format!("{} seconds", self.interval_secs),
                true,
            ),
            field("Results Per Check", &self.per_page.to_string(), true),
            field(
                "Tracked Items",
                &format!("{} items", self.tracked_items),
                true,
            ),
            field("Poller", &self.phase, true),
            field(
                "Checks",
                &format!(
                    "{} ({} notifications sent)",
                    self.cycles, self.notifications_sent
                ),
                true,
            ),
            field(
                "Last Check",
                self.last_check.as_deref().unwrap_or("Never"),
                true,
            ),
        ];

        if let Some(error) = &self.last_error {
            fields.push(field("Last Error", error, false));
        }

        fields
    }
}

/// Commands listed by `!help`, as (usage, description) pairs
pub fn help_fields() -> Vec<DetailField> {
    vec![
        field("!help", "Show this help message", false),
        field("!set_keyword <keyword>", "Set search keyword", false),
        field("!set_price <min> <max>", "Set price range", false),
        field(
            "!set_marketplace <name>",
            &format!("Set marketplace ({})", Marketplace::available()),
            false,
        ),
        field(
            "!set_interval <seconds>",
            &format!(
                "Set check interval ({}-{} seconds)",
                MIN_INTERVAL_SECS, MAX_INTERVAL_SECS
            ),
            false,
        ),
        field("!status", "Show current search configuration", false),
        field("!clear", "Clear sent items history", false),
    ]
}

/// Formats a price range in the marketplace's currency
pub fn format_price_range(min: f64, max: f64, marketplace: Marketplace) -> String {
    match marketplace.default_currency() {
        "$" => format!("${} - ${}", format_amount(min), format_amount(max)),
        currency => format!(
            "{} - {} {}",
            format_amount(min),
            format_amount(max),
            currency
        ),
    }
}

impl Reply {
    /// Plain-text rendering, for logs and sinks without rich formatting
    pub fn to_text(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Error(message) => format!("❌ {}", message),
            Reply::Help => {
                let mut text = format!("{}\nAvailable commands:", HELP_TITLE);
                for f in help_fields() {
                    text.push_str(&format!("\n`{}` - {}", f.name, f.value));
                }
                text
            }
            Reply::Status(report) => {
                let mut text = STATUS_TITLE.to_string();
                for f in report.fields() {
                    text.push_str(&format!("\n{}: {}", f.name, f.value));
                }
                text
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

fn field(name: &'static str, value: &str, inline: bool) -> DetailField {
    DetailField {
        name,
        value: value.to_string(),
        inline,
    }
}
