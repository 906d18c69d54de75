/// Phase definitions for the poll loop
///
/// The loop moves through these phases once per cycle and never terminates on
/// its own; only process shutdown ends it.
use std::fmt;

/// Represents what the poll loop is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollPhase {
    /// No keyword is configured; the fetch was skipped and the loop waits for the next cycle
    Idle,

    /// Waiting for the item source to answer
    Fetching,

    /// Sending notifications for new items
    Dispatching,

    /// Waiting for the next cycle
    #[default]
    Sleeping,
}

impl PollPhase {
    /// Returns true while the loop is suspended on an external call
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::Dispatching)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Dispatching => "dispatching",
            Self::Sleeping => "sleeping",
        }
    }
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
