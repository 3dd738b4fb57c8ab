use thiserror::Error;

/// Result type for a Clerk call.
pub type ClerkResult<T> = std::result::Result<T, ClerkError>;

/// Errors a Clerk call can surface.
///
/// A naive client retries forever in the face of timeouts; a library can't
/// honestly block forever and stay testable, so retries are bounded by an
/// attempt ceiling and exhausting it raises [`ClerkError::Exhausted`]
/// instead of spinning. Callers that want literal infinite retry can wrap a
/// Clerk call in their own loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClerkError {
    /// Every preference-list member timed out on every sweep, up to the
    /// attempt ceiling.
    #[error("exhausted {attempts} attempts against the preference list for {key:?} with no reply")]
    Exhausted { key: String, attempts: usize },

    /// A replica returned a non-timeout error (e.g. shard mismatch from a
    /// misconfigured preference list). Treated as terminal rather than
    /// retried, since retrying past a misconfiguration would just repeat
    /// the same failure at every replica.
    #[error("rpc error: {0}")]
    Rpc(String),
}
