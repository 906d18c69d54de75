//! Integration tests for Marketplace-Relay
//!
//! Marketplace and Discord traffic is served by wiremock; the poll loop is driven
//! with in-memory sources and sinks on a paused tokio clock.

mod discord_tests;
mod poll_loop_tests;
mod scrape_tests;
