//! Discord module for the chat side of the relay
//!
//! This module talks to Discord over its REST API:
//! - `DiscordClient`: authenticated requests for messages and the bot user
//! - `DiscordSink`: posts notifications as embeds
//! - `CommandListener`: polls the channel for commands and posts the replies
//! - `connect`: logs the bot in and announces it at startup

mod client;
mod embed;
mod listener;
mod models;
mod sink;
mod startup;

pub use client::{DiscordClient, MAX_HISTORY_LIMIT};
pub use embed::{reply_payload, EMBED_COLOR};
pub use listener::CommandListener;
pub use models::{AllowedMentions, Embed, EmbedField, EmbedImage, Message, MessagePayload, User};
pub use sink::DiscordSink;
pub use startup::{connect, ONLINE_MESSAGE};
