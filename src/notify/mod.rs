//! Notification module for announcing items
//!
//! This module turns items into notifications and defines where they go:
//! - `Notification`: the formatted content for one item
//! - `NotificationSink`: the delivery interface the poll loop depends on
//! - `ConsoleSink`: writes notifications as text (dry runs)
//!
//! The Discord sink lives in [`crate::discord`].

mod console;
mod payload;
mod traits;

pub use console::{render_text, ConsoleSink};
pub use payload::{format_amount, truncate, DetailField, Notification, MAX_TITLE_CHARS};
pub use traits::{NotificationSink, SendError, SendResult};
