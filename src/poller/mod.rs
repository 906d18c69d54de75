//! Poller module - the fetch, dedup and dispatch loop
//!
//! The poll loop is the fault-isolation boundary of the relay: fetch and send
//! failures are logged and counted here and never propagate further.

mod poll_loop;

pub use poll_loop::{CycleOutcome, CycleReport, PollLoop};
