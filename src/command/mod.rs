//! Command module for runtime reconfiguration
//!
//! Chat messages starting with `!` are parsed into commands, applied to the
//! shared relay state, and answered with a reply.
//!
//! # Example
//!
//! ```
//! use marketplace_relay::{CommandRouter, RelayState, Reply};
//! use std::sync::Arc;
//!
//! let router = CommandRouter::new(Arc::new(RelayState::default()));
//! let reply = router.handle("!set_interval 60").unwrap();
//! assert!(matches!(reply, Reply::Text(_)));
//! ```

mod parser;
mod reply;
mod router;

pub use parser::{Command, COMMAND_PREFIX};
pub use reply::{format_price_range, help_fields, Reply, StatusReport, HELP_TITLE, STATUS_TITLE};
pub use router::CommandRouter;
