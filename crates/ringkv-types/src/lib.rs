//! Shared value and clock types for the replicated key-value store.
//!
//! Kept dependency-free and serde-agnostic on purpose: every other crate in
//! the workspace (wire, rpc, server, client) builds on these without pulling
//! in a particular transport or encoding.

mod clock;
mod record;

pub use clock::LocalClock;
pub use record::{RequestId, ValueRecord};
