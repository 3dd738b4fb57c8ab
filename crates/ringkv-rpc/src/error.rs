use thiserror::Error;

/// Result type for RPC calls to a peer.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Errors a [`crate::PeerClient`] call can raise.
///
/// This crate never implements a real wire transport; it's the minimal
/// taxonomy every caller (the Clerk's failover loop, a primary's fan-out
/// loop) needs to distinguish "try the next replica" from "something else
/// went wrong".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The peer did not respond in time. Recoverable: callers retry the
    /// next preference-list member (Clerk) or the next fan-out attempt
    /// (server forwarding).
    #[error("rpc timed out")]
    Timeout,

    /// A non-recoverable error surfaced by the peer (e.g. shard mismatch).
    #[error("{0}")]
    Other(String),
}
