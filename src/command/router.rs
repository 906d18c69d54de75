use crate::command::reply::{format_price_range, StatusReport};
use crate::command::{Command, Reply};
use crate::state::{RelayState, SearchConfig, SearchField};
use std::sync::Arc;

/// Applies chat commands to the shared relay state
///
/// The router is a plain function of text to reply; the Discord listener is one
/// caller, tests are another.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    state: Arc<RelayState>,
}

impl CommandRouter {
    pub fn new(state: Arc<RelayState>) -> Self {
        Self { state }
    }

    /// Handles one chat message
    ///
    /// Returns `None` when the text is not a command. Invalid input yields a
    /// [`Reply::Error`]; this never fails or panics.
    pub fn handle(&self, text: &str) -> Option<Reply> {
        let command = Command::parse(text)?;
        tracing::debug!("Handling command: {:?}", command);

        let reply = match command {
            Command::Help => Reply::Help,
            Command::SetKeyword(value) => self.apply(SearchField::Keyword, value, |search| {
                format!(
                    "🔑 Search keyword set to: **{}**",
                    search.keyword().unwrap_or_default()
                )
            }),
            Command::SetPrice(value) => self.apply(SearchField::PriceRange, value, |search| {
                format!(
                    "💰 Price range set to: **{}**",
                    format_price_range(
                        search.price_min(),
                        search.price_max(),
                        search.marketplace()
                    )
                )
            }),
            Command::SetInterval(value) => self.apply(SearchField::Interval, value, |search| {
                format!(
                    "⏱️ Check interval set to: **{} seconds**",
                    search.interval_secs()
                )
            }),
            Command::SetMarketplace(value) => {
                self.apply(SearchField::Marketplace, value, |search| {
                    format!("🏪 Marketplace set to: **{}**", search.marketplace())
                })
            }
            Command::Status => Reply::Status(StatusReport::new(
                &self.state.snapshot(),
                self.state.seen_count(),
                &self.state.stats(),
            )),
            Command::Clear => {
                let forgotten = self.state.clear_seen();
                tracing::info!("Cleared {} tracked items", forgotten);
                Reply::Text(format!(
                    "🧹 Cleared sent items history ({} items). \
                     Will show all matching items again on next check.",
                    forgotten
                ))
            }
            Command::Unknown(name) => Reply::Error(format!(
                "Unknown command `!{}`. Use `!help` to see available commands.",
                name
            )),
        };

        Some(reply)
    }

    fn apply(
        &self,
        field: SearchField,
        value: &str,
        confirm: impl FnOnce(&SearchConfig) -> String,
    ) -> Reply {
        let result = self.state.with_search(|search| {
            search.set(field, value)?;
            Ok::<_, crate::ConfigError>(confirm(search))
        });

        match result {
            Ok(message) => {
                tracing::info!("Search updated: {:?} = {}", field, value);
                Reply::Text(message)
            }
            Err(e) => {
                tracing::debug!("Rejected {:?} = {:?}: {}", field, value, e);
                Reply::Error(e.to_string())
            }
        }
    }
}
