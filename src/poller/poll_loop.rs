use crate::marketplace::ItemSource;
use crate::notify::{Notification, NotificationSink};
use crate::state::{PollPhase, RelayState};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No keyword configured, nothing was fetched
    Idle,

    /// The fetch succeeded
    Fetched {
        /// Items returned by the source
        found: usize,
        /// Notifications delivered
        sent: usize,
        /// Items skipped because they were already announced
        skipped: usize,
        /// Sends that failed; those items stay unseen
        failed: usize,
    },

    /// The fetch failed; the cycle produced no items
    FetchFailed(String),
}

/// Result of one cycle together with how long to wait before the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    /// Interval of the configuration snapshot the cycle ran with
    pub sleep_for: Duration,
}

/// Repeatedly fetches listings and announces the new ones
pub struct PollLoop {
    source: Box<dyn ItemSource>,
    sink: Box<dyn NotificationSink>,
    state: Arc<RelayState>,
    send_delay: Duration,
}

impl PollLoop {
    /// Creates a poll loop
    ///
    /// # Arguments
    ///
    /// * `source` - Where listings come from
    /// * `sink` - Where notifications go
    /// * `state` - Search configuration, seen set and statistics shared with the command router
    /// * `send_delay` - Fixed pause between two consecutive notifications
    pub fn new(
        source: impl ItemSource + 'static,
        sink: impl NotificationSink + 'static,
        state: Arc<RelayState>,
        send_delay: Duration,
    ) -> Self {
        Self {
            source: Box::new(source),
            sink: Box::new(sink),
            state,
            send_delay,
        }
    }

    pub fn state(&self) -> &Arc<RelayState> {
        &self.state
    }

    /// Runs one cycle: snapshot, fetch, filter, dispatch
    ///
    /// Never fails. Items are sent in source order and marked seen only after a
    /// successful send, so a failed send is retried next cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let search = self.state.snapshot();
        let sleep_for = search.interval();

        let Some(params) = search.search_params() else {
            tracing::debug!("No keyword set, skipping fetch");
            self.finish_cycle(PollPhase::Idle);
            return CycleReport {
                outcome: CycleOutcome::Idle,
                sleep_for,
            };
        };

        self.state.set_phase(PollPhase::Fetching);
        tracing::debug!("Fetching listings for '{}'", params.keyword);

        let items = match self.source.fetch(&params).await {
            Ok(items) => {
                self.state.with_stats(|stats| stats.last_error = None);
                items
            }
            Err(e) => {
                tracing::error!("Failed to fetch items: {}", e);
                let message = e.to_string();
                self.state.with_stats(|stats| {
                    stats.fetch_failures += 1;
                    stats.last_error = Some(message.clone());
                });
                self.finish_cycle(PollPhase::Sleeping);
                return CycleReport {
                    outcome: CycleOutcome::FetchFailed(message),
                    sleep_for,
                };
            }
        };

        self.state.set_phase(PollPhase::Dispatching);
        let found = items.len();
        let (mut sent, mut skipped, mut failed) = (0, 0, 0);

        for item in &items {
            if self.state.is_seen(&item.id) {
                skipped += 1;
                continue;
            }

            if sent + failed > 0 && !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }

            let notification = Notification::from_item(item);
            match self.sink.send(&notification).await {
                Ok(()) => {
                    self.state.mark_seen(&item.id);
                    self.state
                        .with_stats(|stats| stats.notifications_sent += 1);
                    sent += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to send item {}: {}", item.id, e);
                    self.state.with_stats(|stats| stats.send_failures += 1);
                    failed += 1;
                }
            }
        }

        if sent > 0 {
            tracing::info!("Sent {} new items", sent);
        } else {
            tracing::debug!("No new items among {} results", found);
        }

        self.finish_cycle(PollPhase::Sleeping);
        CycleReport {
            outcome: CycleOutcome::Fetched {
                found,
                sent,
                skipped,
                failed,
            },
            sleep_for,
        }
    }

    /// Runs `cycles` cycles, sleeping between them, and returns their reports
    pub async fn run_cycles(&self, cycles: usize) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(cycles);
        for i in 0..cycles {
            let report = self.run_cycle().await;
            let sleep_for = report.sleep_for;
            reports.push(report);
            if i + 1 < cycles {
                tokio::time::sleep(sleep_for).await;
            }
        }
        reports
    }

    /// Runs until the task is dropped
    ///
    /// The first cycle starts immediately; each later one waits for the interval
    /// of the previous cycle's configuration snapshot.
    pub async fn run(self) {
        tracing::info!("Poll loop started");
        loop {
            let report = self.run_cycle().await;
            tokio::time::sleep(report.sleep_for).await;
        }
    }

    /// Records a completed cycle; `phase` is what the loop reports until the next one
    fn finish_cycle(&self, phase: PollPhase) {
        self.state.with_stats(|stats| {
            stats.cycles += 1;
            stats.last_cycle_at = Some(Utc::now());
            stats.phase = phase;
        });
    }
}
