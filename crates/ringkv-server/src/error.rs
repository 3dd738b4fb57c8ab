use thiserror::Error;

/// Result type for a replica's RPC handlers.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors a [`crate::ReplicaServer`] handler can raise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// The requested key's preference list does not include this server.
    #[error("key {key:?} is not in server {server_id}'s shard")]
    NotInShard { key: String, server_id: usize },
}
