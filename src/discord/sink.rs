use crate::discord::client::DiscordClient;
use crate::discord::models::{Embed, MessagePayload};
use crate::notify::{Notification, NotificationSink, SendResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Posts each notification as an embed to one channel
pub struct DiscordSink {
    client: Arc<DiscordClient>,
    channel_id: u64,
}

impl DiscordSink {
    pub fn new(client: Arc<DiscordClient>, channel_id: u64) -> Self {
        Self { client, channel_id }
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send(&self, notification: &Notification) -> SendResult<()> {
        let payload = MessagePayload::embed(Embed::from(notification));
        let message = self.client.post_message(self.channel_id, &payload).await?;
        tracing::debug!(
            "Posted item {} as message {}",
            notification.item_id,
            message.id
        );
        Ok(())
    }
}
