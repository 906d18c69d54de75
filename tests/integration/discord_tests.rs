//! Discord delivery and command intake against a mock API

use async_trait::async_trait;
use marketplace_relay::discord::{CommandListener, DiscordClient, DiscordSink};
use marketplace_relay::marketplace::FetchResult;
use marketplace_relay::notify::SendError;
use marketplace_relay::{
    CommandRouter, Item, ItemSource, Notification, NotificationSink, PollLoop, RelayState,
    SearchConfig, SearchParams,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL: u64 = 42;

fn client(server: &MockServer) -> Arc<DiscordClient> {
    Arc::new(DiscordClient::new(&server.uri(), "test-token", Duration::from_secs(5)).unwrap())
}

fn posted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "900",
        "content": "",
        "author": {"id": "99", "username": "relay", "bot": true}
    }))
}

fn jacket() -> Item {
    let mut item = Item::new(
        "1111111111",
        "Denim Jacket",
        "https://www.ebay.com/itm/1111111111",
        30.0,
        "$",
        "denimstore",
    );
    item.country_of_origin = Some("Germany".to_string());
    item.image_url = Some("https://i.ebayimg.com/1.jpg".to_string());
    item
}

#[tokio::test]
async fn test_sink_posts_embed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(header("authorization", "Bot test-token"))
        .and(body_partial_json(json!({
            "embeds": [{
                "title": "🛍️ Denim Jacket",
                "url": "https://www.ebay.com/itm/1111111111",
                "description": "💰 Price: 30 $",
                "fields": [
                    {"name": "Seller", "value": "👤 denimstore", "inline": false},
                    {"name": "Location", "value": "📍 Germany", "inline": true}
                ],
                "image": {"url": "https://i.ebayimg.com/1.jpg"}
            }],
            "allowed_mentions": {"parse": []}
        })))
        .respond_with(posted())
        .expect(1)
        .mount(&server)
        .await;

    let sink = DiscordSink::new(client(&server), CHANNEL);
    sink.send(&Notification::from_item(&jacket())).await.unwrap();
}

#[tokio::test]
async fn test_sink_reports_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let sink = DiscordSink::new(client(&server), CHANNEL);
    let result = sink.send(&Notification::from_item(&jacket())).await;
    assert!(matches!(result, Err(SendError::Http { status: 500, .. })));
}

struct OneItem;

#[async_trait]
impl ItemSource for OneItem {
    async fn fetch(&self, _params: &SearchParams) -> FetchResult<Vec<Item>> {
        Ok(vec![jacket()])
    }
}

#[tokio::test]
async fn test_item_stays_unseen_until_discord_accepts_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(posted())
        .mount(&server)
        .await;

    let mut search = SearchConfig::new();
    search.set_keyword("jacket").unwrap();
    let state = Arc::new(RelayState::new(search));
    let poll = PollLoop::new(
        OneItem,
        DiscordSink::new(client(&server), CHANNEL),
        state.clone(),
        Duration::ZERO,
    );

    poll.run_cycle().await;
    assert!(!state.is_seen("1111111111"));

    poll.run_cycle().await;
    assert!(state.is_seen("1111111111"));
    assert_eq!(state.stats().notifications_sent, 1);
    assert_eq!(state.stats().send_failures, 1);
}

#[tokio::test]
async fn test_status_command_answered_with_embed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/42/messages"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels/42/messages"))
        .and(query_param("after", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "10",
            "content": "!status",
            "author": {"id": "7", "username": "ann"}
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(body_partial_json(json!({
            "embeds": [{"title": "🔍 Current Search Configuration", "color": 0x5865F2}]
        })))
        .respond_with(posted())
        .expect(1)
        .mount(&server)
        .await;

    let state = Arc::new(RelayState::default());
    let mut listener = CommandListener::new(
        client(&server),
        CHANNEL,
        "99",
        CommandRouter::new(state),
        Duration::from_secs(2),
    );

    assert_eq!(listener.poll_once().await.unwrap(), 0);
    assert_eq!(listener.poll_once().await.unwrap(), 1);
}
