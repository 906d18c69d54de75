use crate::discord::models::{Message, MessagePayload, RateLimitBody, User};
use crate::notify::{truncate, SendError, SendResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Most messages Discord returns per history request
pub const MAX_HISTORY_LIMIT: u8 = 100;

/// Thin client for the parts of the Discord REST API the relay uses
///
/// All calls authenticate with the bot token and share one connection pool.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl DiscordClient {
    /// Creates a client
    ///
    /// # Arguments
    ///
    /// * `api_base` - Root of the REST API, e.g. `https://discord.com/api/v10`
    /// * `token` - Bot token, without the `Bot ` prefix
    /// * `timeout` - Per-request timeout
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!(
                "DiscordBot (marketplace-relay, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Returns the bot's own user
    pub async fn current_user(&self) -> SendResult<User> {
        let response = self.send(self.http.get(self.url("/users/@me"))).await?;
        Ok(response.json().await?)
    }

    /// Posts a message to a channel
    pub async fn post_message(
        &self,
        channel_id: u64,
        payload: &MessagePayload,
    ) -> SendResult<Message> {
        let url = self.url(&format!("/channels/{}/messages", channel_id));
        let response = self.send(self.http.post(url).json(payload)).await?;
        Ok(response.json().await?)
    }

    /// Returns up to `limit` messages posted after the message `after`
    ///
    /// Discord does not guarantee an order; callers sort by id.
    pub async fn messages_after(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> SendResult<Vec<Message>> {
        let url = self.url(&format!("/channels/{}/messages", channel_id));
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        let request = self.http.get(url).query(&[
            ("after", after.to_string()),
            ("limit", limit.to_string()),
        ]);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Returns the id of the newest message in a channel, if it has any
    pub async fn latest_message_id(&self, channel_id: u64) -> SendResult<Option<u64>> {
        let url = self.url(&format!("/channels/{}/messages", channel_id));
        let response = self.send(self.http.get(url).query(&[("limit", "1")])).await?;
        let messages: Vec<Message> = response.json().await?;
        Ok(messages.iter().filter_map(Message::snowflake).max())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn send(&self, request: RequestBuilder) -> SendResult<Response> {
        let response = request
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await?;
        check_status(response).await
    }
}

/// Turns non-success responses into the matching `SendError`
async fn check_status(response: Response) -> SendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .json::<RateLimitBody>()
            .await
            .map(|body| body.retry_after)
            .unwrap_or(1.0);
        tracing::warn!("Discord rate limit hit, retry after {:.1}s", retry_after);
        return Err(SendError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(SendError::Http {
        status: status.as_u16(),
        message: truncate(body.trim(), 200),
    })
}
