//! Cluster configuration and key placement for the replicated store.
//!
//! Numeric cluster parameters live here in [`ClusterConfig`], kept separate
//! from peer RPC handles (which live in `ringkv-rpc`) so configuration can
//! be validated, copied, and reasoned about without dragging connection
//! state along with it.

mod cluster;
mod error;
mod placement;

pub use cluster::ClusterConfig;
pub use error::{ConfigError, Result};
pub use placement::{preference_list, primary_of};
