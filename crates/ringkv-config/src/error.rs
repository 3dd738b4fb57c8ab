use thiserror::Error;

/// Result type for cluster configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building a [`crate::ClusterConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Replication degree exceeds the number of servers in the cluster.
    #[error("nreplicas ({nreplicas}) must be <= nservers ({nservers})")]
    TooManyReplicas { nreplicas: usize, nservers: usize },

    /// A cluster needs at least one server.
    #[error("nservers must be >= 1")]
    NoServers,
}
