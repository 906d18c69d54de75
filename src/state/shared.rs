use crate::state::{PollPhase, SearchConfig, SeenSet};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Counters describing the poll loop's progress
#[derive(Debug, Clone, Default)]
pub struct PollStats {
    /// Number of completed cycles, idle ones included
    pub cycles: u64,

    /// Notifications delivered since startup
    pub notifications_sent: u64,

    /// Fetches that ended in an error
    pub fetch_failures: u64,

    /// Sends that ended in an error
    pub send_failures: u64,

    /// When the last cycle finished
    pub last_cycle_at: Option<DateTime<Utc>>,

    /// Message of the most recent fetch failure, cleared by the next successful fetch
    pub last_error: Option<String>,

    /// What the loop is doing right now
    pub phase: PollPhase,
}

/// State shared between the command router and the poll loop
///
/// Each part sits behind its own lock. Locks are only held for the duration of a
/// single read or write and never across an `.await`, so the two sides interleave
/// without ever overlapping inside one operation.
#[derive(Debug, Default)]
pub struct RelayState {
    search: Mutex<SearchConfig>,
    seen: Mutex<SeenSet>,
    stats: Mutex<PollStats>,
}

impl RelayState {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search: Mutex::new(search),
            seen: Mutex::new(SeenSet::new()),
            stats: Mutex::new(PollStats::default()),
        }
    }

    /// Runs `f` with exclusive access to the search configuration
    pub fn with_search<R>(&self, f: impl FnOnce(&mut SearchConfig) -> R) -> R {
        f(&mut self.search.lock())
    }

    /// Returns a consistent copy of the search configuration
    pub fn snapshot(&self) -> SearchConfig {
        self.search.lock().snapshot()
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.lock().contains(id)
    }

    pub fn mark_seen(&self, id: &str) {
        self.seen.lock().add(id);
    }

    /// Empties the seen set and returns how many ids were forgotten
    pub fn clear_seen(&self) -> usize {
        let mut seen = self.seen.lock();
        let count = seen.len();
        seen.clear();
        count
    }

    pub fn seen_count(&self) -> usize {
        self.seen.lock().len()
    }

    /// Runs `f` with exclusive access to the poll statistics
    pub fn with_stats<R>(&self, f: impl FnOnce(&mut PollStats) -> R) -> R {
        f(&mut self.stats.lock())
    }

    pub fn stats(&self) -> PollStats {
        self.stats.lock().clone()
    }

    pub fn set_phase(&self, phase: PollPhase) {
        self.stats.lock().phase = phase;
    }
}
