use std::sync::Arc;

use ringkv_config::ClusterConfig;
use ringkv_rpc::{PeerClient, Result as RpcResult, RpcError};
use ringkv_types::RequestId;
use ringkv_wire::{GetArgs, PutAppendArgs};

use crate::error::{ClerkError, ClerkResult};

/// Number of full preference-list sweeps attempted before giving up.
///
/// A cluster with at least one reachable preference-list member per key
/// should succeed within the first sweep; this ceiling exists only to turn
/// a total partition into a typed error instead of an infinite loop.
const DEFAULT_MAX_SWEEPS: usize = 100;

/// Mask for a 62-bit random request id.
const REQUEST_ID_MASK: u64 = (1u64 << 62) - 1;

/// Translates user operations (Get/Put/Append) into one RPC to a chosen
/// preference-list member, retrying with failover until a reply arrives.
pub struct Clerk {
    config: ClusterConfig,
    servers: Vec<Arc<dyn PeerClient>>,
    max_sweeps: usize,
}

impl Clerk {
    /// `servers[i]` must be the RPC handle for server `i`; its length must
    /// equal `config.nservers`.
    pub fn new(config: ClusterConfig, servers: Vec<Arc<dyn PeerClient>>) -> Self {
        assert_eq!(
            servers.len(),
            config.nservers,
            "one peer handle required per configured server"
        );
        Self {
            config,
            servers,
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }

    /// Overrides the sweep ceiling (useful for tests that want failure to
    /// surface quickly rather than after 100 sweeps).
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Fetches the current value for `key`. Returns `""` if the key has
    /// never been written anywhere reachable.
    pub fn get(&self, key: &str) -> ClerkResult<String> {
        let id = next_request_id();
        let args = GetArgs::client(key, id);
        self.sweep(key, |server_id| {
            self.servers[server_id]
                .get(args.clone())
                .map(|reply| reply.payload)
        })
    }

    /// Overwrites the value stored for `key`.
    pub fn put(&self, key: &str, value: impl Into<String>) -> ClerkResult<()> {
        let id = next_request_id();
        let args = PutAppendArgs::new(key, value, id);
        self.sweep(key, |server_id| {
            self.servers[server_id]
                .put(args.clone())
                .map(|reply| reply.0)
        })?;
        Ok(())
    }

    /// Appends `value` to the payload stored for `key` and returns the
    /// payload as it stood immediately before this append. Safe to retry:
    /// every attempt for this call carries the same request id.
    pub fn append(&self, key: &str, value: impl Into<String>) -> ClerkResult<String> {
        let id = next_request_id();
        let args = PutAppendArgs::new(key, value, id);
        self.sweep(key, |server_id| {
            self.servers[server_id]
                .append(args.clone())
                .map(|reply| reply.0)
        })
    }

    /// Attempts `call` against each preference-list member in order,
    /// starting at the primary; on a timeout, advances to the next member.
    /// If a full sweep fails, restarts from the primary, up to
    /// `max_sweeps` sweeps. Returns the first non-timeout reply.
    fn sweep<F>(&self, key: &str, mut call: F) -> ClerkResult<String>
    where
        F: FnMut(usize) -> RpcResult<String>,
    {
        let list = self.config.preference_list(key);
        for sweep in 0..self.max_sweeps {
            for &server_id in &list {
                match call(server_id) {
                    Ok(reply) => return Ok(reply),
                    Err(RpcError::Timeout) => {
                        tracing::debug!(key, server = server_id, sweep, "RPC timed out, trying next replica");
                    }
                    Err(RpcError::Other(message)) => return Err(ClerkError::Rpc(message)),
                }
            }
            tracing::debug!(key, sweep, "preference list exhausted, restarting sweep from primary");
        }
        Err(ClerkError::Exhausted {
            key: key.to_string(),
            attempts: self.max_sweeps,
        })
    }
}

fn next_request_id() -> RequestId {
    rand::random::<u64>() & REQUEST_ID_MASK
}
