//! Poll loop behavior across cycles

use async_trait::async_trait;
use marketplace_relay::marketplace::{FetchError, FetchResult};
use marketplace_relay::notify::{SendError, SendResult};
use marketplace_relay::poller::CycleOutcome;
use marketplace_relay::{
    CommandRouter, Item, ItemSource, Notification, NotificationSink, PollLoop, RelayState,
    SearchConfig, SearchParams,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers each fetch with the next scripted response, repeating the last one
#[derive(Clone, Default)]
struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<Vec<&'static str>>>>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(responses: Vec<Vec<&'static str>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        let source = Self::default();
        source.fail.store(true, Ordering::SeqCst);
        source
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for ScriptedSource {
    async fn fetch(&self, params: &SearchParams) -> FetchResult<Vec<Item>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Timeout {
                url: format!("https://www.ebay.com/sch/i.html?_nkw={}", params.keyword),
            });
        }

        let mut responses = self.responses.lock();
        let ids = if responses.len() > 1 {
            responses.pop_front().unwrap_or_default()
        } else {
            responses.front().cloned().unwrap_or_default()
        };
        Ok(ids.into_iter().map(item).collect())
    }
}

/// Records delivered ids; fails every send while `down` is set
#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    down: Arc<AtomicBool>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notification: &Notification) -> SendResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(SendError::Network("connection reset".to_string()));
        }
        self.sent.lock().push(notification.item_id.clone());
        Ok(())
    }
}

fn item(id: &str) -> Item {
    Item::new(
        id,
        format!("Jacket {}", id),
        format!("https://www.ebay.com/itm/{}", id),
        25.0,
        "$",
        "seller",
    )
}

fn state(keyword: Option<&str>) -> Arc<RelayState> {
    let mut search = SearchConfig::new();
    if let Some(keyword) = keyword {
        search.set_keyword(keyword).unwrap();
    }
    Arc::new(RelayState::new(search))
}

fn poll_loop(source: &ScriptedSource, sink: &RecordingSink, state: &Arc<RelayState>) -> PollLoop {
    PollLoop::new(source.clone(), sink.clone(), state.clone(), Duration::ZERO)
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_new_items_only() {
    let source = ScriptedSource::new(vec![vec!["A", "B"], vec!["A", "B", "C"]]);
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let poll = poll_loop(&source, &sink, &state);

    poll.run_cycle().await;
    assert_eq!(sink.sent(), vec!["A", "B"]);
    assert_eq!(state.seen_count(), 2);

    poll.run_cycle().await;
    assert_eq!(sink.sent(), vec!["A", "B", "C"]);
    assert_eq!(state.seen_count(), 3);
    assert!(state.is_seen("C"));
}

#[tokio::test(start_paused = true)]
async fn test_seen_item_never_sent_twice() {
    let source = ScriptedSource::new(vec![vec!["A"]]);
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let poll = poll_loop(&source, &sink, &state);

    let reports = poll.run_cycles(5).await;
    assert_eq!(sink.sent(), vec!["A"]);
    assert_eq!(
        reports.last().map(|r| r.outcome.clone()),
        Some(CycleOutcome::Fetched {
            found: 1,
            sent: 0,
            skipped: 1,
            failed: 0
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_send_retried_next_cycle() {
    let source = ScriptedSource::new(vec![vec!["A"]]);
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let poll = poll_loop(&source, &sink, &state);

    sink.down.store(true, Ordering::SeqCst);
    poll.run_cycle().await;
    assert!(!state.is_seen("A"));
    assert_eq!(state.stats().send_failures, 1);

    sink.down.store(false, Ordering::SeqCst);
    poll.run_cycle().await;
    assert_eq!(sink.sent(), vec!["A"]);
    assert!(state.is_seen("A"));
}

#[tokio::test(start_paused = true)]
async fn test_no_keyword_never_fetches() {
    let source = ScriptedSource::new(vec![vec!["A"]]);
    let sink = RecordingSink::default();
    let state = state(None);
    let poll = poll_loop(&source, &sink, &state);

    let reports = poll.run_cycles(3).await;
    assert!(reports.iter().all(|r| r.outcome == CycleOutcome::Idle));
    assert_eq!(source.calls(), 0);
    assert_eq!(state.stats().cycles, 3);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failures_do_not_stop_the_loop() {
    let source = ScriptedSource::failing();
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let poll = poll_loop(&source, &sink, &state);

    let failures = 4;
    let reports = poll.run_cycles(failures).await;
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome, CycleOutcome::FetchFailed(_))));

    source.fail.store(false, Ordering::SeqCst);
    *source.responses.lock() = vec![vec!["A"]].into();
    let report = poll.run_cycle().await;

    assert_eq!(source.calls(), failures + 1);
    assert_eq!(state.stats().cycles, failures as u64 + 1);
    assert_eq!(state.stats().fetch_failures, failures as u64);
    assert_eq!(state.stats().last_error, None);
    assert!(matches!(report.outcome, CycleOutcome::Fetched { sent: 1, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_clear_command_resets_dedup() {
    let source = ScriptedSource::new(vec![vec!["A"]]);
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let router = CommandRouter::new(state.clone());
    let poll = poll_loop(&source, &sink, &state);

    poll.run_cycle().await;
    poll.run_cycle().await;
    assert_eq!(sink.sent(), vec!["A"]);

    router.handle("!clear").unwrap();
    poll.run_cycle().await;
    assert_eq!(sink.sent(), vec!["A", "A"]);
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_applies_to_next_sleep() {
    let source = ScriptedSource::new(vec![vec![]]);
    let sink = RecordingSink::default();
    let state = state(Some("jacket"));
    let router = CommandRouter::new(state.clone());
    let poll = poll_loop(&source, &sink, &state);

    assert_eq!(poll.run_cycle().await.sleep_for, Duration::from_secs(60));

    router.handle("!set_interval 15").unwrap();
    let started = tokio::time::Instant::now();
    let reports = poll.run_cycles(2).await;
    assert_eq!(reports[0].sleep_for, Duration::from_secs(15));
    assert!(started.elapsed() >= Duration::from_secs(15));
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_keyword_set_by_command_starts_search() {
    let source = ScriptedSource::new(vec![vec!["A"]]);
    let sink = RecordingSink::default();
    let state = state(None);
    let router = CommandRouter::new(state.clone());
    let poll = poll_loop(&source, &sink, &state);

    assert_eq!(poll.run_cycle().await.outcome, CycleOutcome::Idle);

    router.handle("!set_keyword jacket").unwrap();
    poll.run_cycle().await;
    assert_eq!(source.calls(), 1);
    assert_eq!(sink.sent(), vec!["A"]);
}
