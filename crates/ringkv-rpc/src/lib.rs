//! The peer RPC abstraction: a [`PeerClient`] trait standing in for the RPC
//! fabric between replicas, plus a fault-injecting in-process transport
//! used by tests and the demo CLI.

mod error;
mod peer;

pub use error::{Result, RpcError};
pub use peer::{FaultInjectingPeer, PeerClient, PeerStatus};
