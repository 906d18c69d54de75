//! State module for the relay's runtime data
//!
//! This module holds everything that changes while the relay runs. None of it is
//! persisted; a restart resets all of it to defaults.
//!
//! # Components
//!
//! - `SearchConfig`: keyword, price bounds, poll interval and marketplace
//! - `SeenSet`: ids of items already announced
//! - `PollPhase`: what the poll loop is doing
//! - `RelayState`: the above, shared between the command router and the poll loop

mod poll_phase;
mod search_config;
mod seen_set;
mod shared;

// Re-export main types
pub use poll_phase::PollPhase;
pub use search_config::{SearchConfig, SearchField, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
pub use seen_set::SeenSet;
pub use shared::{PollStats, RelayState};
