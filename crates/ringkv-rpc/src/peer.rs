use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ringkv_wire::{GetArgs, GetReply, PutAppendArgs, PutAppendReply};

use crate::error::{Result, RpcError};

/// A point-to-point call primitive to one server: the RPC fabric, reduced
/// to the one capability the protocol layer actually needs.
///
/// Every replica server implements it directly (see `ringkv-server`'s
/// `impl PeerClient for ReplicaServer`) so that both "call a peer over the
/// wire" and "call a peer via a direct in-process handle" are the same
/// trait from the caller's point of view — the handle's origin never
/// matters, only what it can do.
pub trait PeerClient: Send + Sync {
    fn get(&self, args: GetArgs) -> Result<GetReply>;
    fn put(&self, args: PutAppendArgs) -> Result<PutAppendReply>;
    fn append(&self, args: PutAppendArgs) -> Result<PutAppendReply>;
}

/// Whether a [`FaultInjectingPeer`] currently delivers calls to its
/// delegate or fails them as if the peer were unreachable.
///
/// Collapses a process supervisor's usual `Stopped`/`Starting`/`Running`/
/// `Crashed` lifecycle down to the two states that matter here: a peer is
/// either reachable or it isn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    Up,
    Down,
}

/// Wraps any [`PeerClient`] with a toggle that can simulate the peer being
/// unreachable — used by the test/demo harness to exercise failover and
/// dropped-reply retries without a real network.
pub struct FaultInjectingPeer {
    delegate: Arc<dyn PeerClient>,
    up: AtomicBool,
}

impl FaultInjectingPeer {
    pub fn new(delegate: Arc<dyn PeerClient>) -> Self {
        Self {
            delegate,
            up: AtomicBool::new(true),
        }
    }

    pub fn set_status(&self, status: PeerStatus) {
        self.up.store(status == PeerStatus::Up, Ordering::SeqCst);
    }

    pub fn status(&self) -> PeerStatus {
        if self.up.load(Ordering::SeqCst) {
            PeerStatus::Up
        } else {
            PeerStatus::Down
        }
    }

    fn check_reachable(&self) -> Result<()> {
        if self.up.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RpcError::Timeout)
        }
    }
}

/// Runs `call` to completion on a freshly spawned thread and joins it,
/// standing in for the worker thread a real transport would hand an
/// inbound RPC to. Panics in the delegate propagate as a panic here too,
/// rather than surfacing as an `RpcError` — a handler panic is a bug, not
/// a peer-unreachable condition.
fn on_worker_thread<T, F>(call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    std::thread::spawn(call)
        .join()
        .expect("peer call thread panicked")
}

impl PeerClient for FaultInjectingPeer {
    fn get(&self, args: GetArgs) -> Result<GetReply> {
        self.check_reachable()?;
        let delegate = self.delegate.clone();
        on_worker_thread(move || delegate.get(args))
    }

    fn put(&self, args: PutAppendArgs) -> Result<PutAppendReply> {
        self.check_reachable()?;
        let delegate = self.delegate.clone();
        on_worker_thread(move || delegate.put(args))
    }

    fn append(&self, args: PutAppendArgs) -> Result<PutAppendReply> {
        self.check_reachable()?;
        let delegate = self.delegate.clone();
        on_worker_thread(move || delegate.append(args))
    }
}
