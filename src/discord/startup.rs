use crate::config::{Credentials, DiscordConfig};
use crate::discord::client::DiscordClient;
use crate::discord::models::{MessagePayload, User};
use std::time::Duration;

/// Greeting posted to the channel when `announce-startup` is on
pub const ONLINE_MESSAGE: &str =
    "🤖 Marketplace Bot is now online! Use `!help` to see available commands.";

/// Logs the bot in and optionally announces it in the channel
///
/// Returns the client together with the bot's own user, whose id the command
/// listener needs to ignore its own messages. A rejected token surfaces as
/// `RelayError::Discord` with the HTTP status Discord answered with.
pub async fn connect(
    config: &DiscordConfig,
    credentials: &Credentials,
    timeout: Duration,
) -> crate::Result<(DiscordClient, User)> {
    let client = DiscordClient::new(&config.api_base, &credentials.token, timeout)?;

    let me = client.current_user().await?;
    tracing::info!("✅ Bot logged in as {}", me.username);

    if config.announce_startup {
        client
            .post_message(credentials.channel_id, &MessagePayload::text(ONLINE_MESSAGE))
            .await?;
        tracing::debug!("Announced startup in channel {}", credentials.channel_id);
    }

    Ok((client, me))
}
