use crate::command::CommandRouter;
use crate::discord::client::{DiscordClient, MAX_HISTORY_LIMIT};
use crate::discord::embed::reply_payload;
use crate::discord::models::Message;
use crate::notify::SendResult;
use std::sync::Arc;
use std::time::Duration;

/// Polls a channel for command messages and answers them
///
/// Only messages posted after the listener started are considered. The bot's
/// own messages and those of other bots are skipped.
pub struct CommandListener {
    client: Arc<DiscordClient>,
    channel_id: u64,
    bot_user_id: String,
    router: CommandRouter,
    poll_interval: Duration,
    last_seen: Option<u64>,
}

impl CommandListener {
    pub fn new(
        client: Arc<DiscordClient>,
        channel_id: u64,
        bot_user_id: impl Into<String>,
        router: CommandRouter,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            channel_id,
            bot_user_id: bot_user_id.into(),
            router,
            poll_interval,
            last_seen: None,
        }
    }

    /// Checks the channel once and handles any new commands
    ///
    /// The first call only records where the channel history ends, so commands
    /// posted before startup are not replayed.
    ///
    /// # Returns
    ///
    /// The number of messages that produced a reply
    pub async fn poll_once(&mut self) -> SendResult<usize> {
        let Some(after) = self.last_seen else {
            let latest = self.client.latest_message_id(self.channel_id).await?;
            self.last_seen = Some(latest.unwrap_or(0));
            tracing::debug!("Command listener starting after message {:?}", latest);
            return Ok(0);
        };

        let mut messages: Vec<(u64, Message)> = self
            .client
            .messages_after(self.channel_id, after, MAX_HISTORY_LIMIT)
            .await?
            .into_iter()
            .filter_map(|m| m.snowflake().map(|id| (id, m)))
            .filter(|(id, _)| *id > after)
            .collect();
        messages.sort_by_key(|(id, _)| *id);

        let mut handled = 0;
        for (id, message) in messages {
            self.last_seen = Some(id);

            if message.author.id == self.bot_user_id || message.author.bot {
                continue;
            }

            let Some(reply) = self.router.handle(&message.content) else {
                continue;
            };
            tracing::info!(
                "Command from {}: {}",
                message.author.username,
                message.content.trim()
            );

            // The command is applied either way; a lost reply is only logged
            if let Err(e) = self
                .client
                .post_message(self.channel_id, &reply_payload(&reply))
                .await
            {
                tracing::warn!("Failed to post command reply: {}", e);
            }
            handled += 1;
        }

        Ok(handled)
    }

    /// Polls forever at the configured interval
    pub async fn run(mut self) {
        tracing::info!(
            "Listening for commands every {}ms",
            self.poll_interval.as_millis()
        );
        loop {
            if let Err(e) = self.poll_once().await {
                tracing::warn!("Failed to check for commands: {}", e);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
