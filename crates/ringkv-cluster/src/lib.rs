//! In-process cluster harness: wires N [`ReplicaServer`]s together through
//! [`FaultInjectingPeer`]s and hands out a ready-to-use [`Clerk`].
//!
//! This is the workspace's analogue of a process supervisor, simplified
//! from OS-process supervision down to in-process wiring since there is no
//! network stack here to supervise — every replica lives in the same
//! address space and talks to its peers through trait objects.

use std::collections::HashMap;
use std::sync::Arc;

use ringkv_client::Clerk;
use ringkv_config::{ClusterConfig, ConfigError};
use ringkv_rpc::{FaultInjectingPeer, PeerClient, PeerStatus};
use ringkv_server::ReplicaServer;

/// A fully wired, in-process replica set plus a [`Clerk`] to drive it.
pub struct LocalCluster {
    config: ClusterConfig,
    servers: Vec<Arc<ReplicaServer>>,
    faults: Vec<Arc<FaultInjectingPeer>>,
    clerk: Clerk,
}

impl LocalCluster {
    /// Builds `nservers` replicas configured for `nreplicas`-way
    /// replication, links every replica to every other through a
    /// fault-injecting peer handle, and constructs a [`Clerk`] over the
    /// same handles.
    pub fn new(nservers: usize, nreplicas: usize) -> Result<Self, ConfigError> {
        let config = ClusterConfig::new(nservers, nreplicas)?;

        let servers: Vec<Arc<ReplicaServer>> = (0..nservers)
            .map(|id| Arc::new(ReplicaServer::new(id, config)))
            .collect();

        let faults: Vec<Arc<FaultInjectingPeer>> = servers
            .iter()
            .map(|server| Arc::new(FaultInjectingPeer::new(server.clone())))
            .collect();

        for (id, server) in servers.iter().enumerate() {
            let peers: HashMap<usize, Arc<dyn PeerClient>> = faults
                .iter()
                .enumerate()
                .map(|(peer_id, fault)| (peer_id, fault.clone() as Arc<dyn PeerClient>))
                .collect();
            tracing::debug!(server = id, peers = peers.len(), "wiring replica peer table");
            server.set_peers(peers);
        }

        let clerk_handles: Vec<Arc<dyn PeerClient>> = faults
            .iter()
            .map(|fault| fault.clone() as Arc<dyn PeerClient>)
            .collect();
        let clerk = Clerk::new(config, clerk_handles);

        Ok(Self {
            config,
            servers,
            faults,
            clerk,
        })
    }

    pub fn config(&self) -> ClusterConfig {
        self.config
    }

    /// The shared [`Clerk`] for issuing Get/Put/Append calls against this
    /// cluster.
    pub fn clerk(&self) -> &Clerk {
        &self.clerk
    }

    /// Direct handle to replica `id`, bypassing the Clerk and the
    /// fault-injecting transport — useful for asserting on internal state
    /// or issuing a peer-internal RPC that should be rejected.
    pub fn server(&self, id: usize) -> Arc<ReplicaServer> {
        self.servers[id].clone()
    }

    /// Marks replica `id` up or down for every peer that talks to it
    /// (including the Clerk), simulating the replica becoming unreachable.
    pub fn set_peer_status(&self, id: usize, status: PeerStatus) {
        self.faults[id].set_status(status);
    }
}

