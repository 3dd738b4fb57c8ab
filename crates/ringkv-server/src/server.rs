use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use ringkv_config::ClusterConfig;
use ringkv_rpc::{PeerClient, Result as RpcResult, RpcError};
use ringkv_types::{LocalClock, ValueRecord};
use ringkv_wire::{GetArgs, GetReply, PutAppendArgs, PutAppendReply};

use crate::error::{ServerError, ServerResult};
use crate::seen::{SeenTable, DEFAULT_CAPACITY};

/// Maximum number of times a primary retries a single forwarded write to
/// one peer before giving up on that peer for this request.
const MAX_FORWARD_ATTEMPTS: usize = 5;

/// One replica in the cluster: owns a shard of keys, serves Get/Put/Append,
/// and — when it is the primary for a key — fans writes out to the other
/// members of that key's preference list.
pub struct ReplicaServer {
    id: usize,
    config: ClusterConfig,
    kv: Mutex<HashMap<String, ValueRecord>>,
    seen: Mutex<SeenTable>,
    clock: LocalClock,
    peers: OnceLock<HashMap<usize, Arc<dyn PeerClient>>>,
}

impl ReplicaServer {
    pub fn new(id: usize, config: ClusterConfig) -> Self {
        Self {
            id,
            config,
            kv: Mutex::new(HashMap::new()),
            seen: Mutex::new(SeenTable::new(DEFAULT_CAPACITY)),
            clock: LocalClock::new(),
            peers: OnceLock::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn config(&self) -> ClusterConfig {
        self.config
    }

    /// Wires this replica's peer handles. Called once by the cluster
    /// harness after every `ReplicaServer` has been constructed (peers form
    /// a cycle, so they can't be supplied at construction time).
    pub fn set_peers(&self, peers: HashMap<usize, Arc<dyn PeerClient>>) {
        self.peers
            .set(peers)
            .unwrap_or_else(|_| panic!("server {} peers already wired", self.id));
    }

    fn peer(&self, id: usize) -> Arc<dyn PeerClient> {
        self.peers
            .get()
            .expect("peers not wired")
            .get(&id)
            .unwrap_or_else(|| panic!("server {} has no peer handle for {id}", self.id))
            .clone()
    }

    fn require_membership(&self, key: &str) -> ServerResult<Vec<usize>> {
        let list = self.config.preference_list(key);
        if list.contains(&self.id) {
            Ok(list)
        } else {
            Err(ServerError::NotInShard {
                key: key.to_string(),
                server_id: self.id,
            })
        }
    }

    /// Handles a `Get`. `pre_merge = false` (or `nreplicas == 0`) is the
    /// peer-internal path: return local state only, never recurse. With
    /// `pre_merge = true` this collects every reachable replica's local
    /// record, picks the last-writer-wins candidate, read-repairs this
    /// replica if the winner is newer, and returns the winner.
    #[tracing::instrument(skip_all, fields(server = self.id, key = %args.key, id = args.id))]
    pub fn handle_get(&self, args: GetArgs) -> ServerResult<GetReply> {
        let list = self.require_membership(&args.key)?;

        if !args.pre_merge || self.config.nreplicas == 0 {
            let record = self.local_record(&args.key, args.id);
            return Ok(record.into());
        }

        let mut candidates = vec![self.local_record(&args.key, args.id)];
        for &peer_id in &list {
            if peer_id == self.id {
                continue;
            }
            match self
                .peer(peer_id)
                .get(GetArgs::peer_internal(args.key.clone(), args.id))
            {
                Ok(reply) => candidates.push(reply.into()),
                Err(err) => {
                    tracing::warn!(
                        server = self.id,
                        peer = peer_id,
                        key = %args.key,
                        %err,
                        "internal GET for merge failed"
                    );
                }
            }
        }

        let winner = merge_last_writer_wins(candidates);
        if !winner.is_absent() {
            let mut kv = self.kv.lock().expect("kv mutex poisoned");
            kv.insert(args.key.clone(), winner.clone());
        }

        tracing::debug!(server = self.id, key = %args.key, ts = winner.ts, "GET merged");
        Ok(winner.into())
    }

    fn local_record(&self, key: &str, request_id: u64) -> ValueRecord {
        let kv = self.kv.lock().expect("kv mutex poisoned");
        kv.get(key)
            .cloned()
            .unwrap_or_else(|| ValueRecord::absent(request_id))
    }

    /// Handles a `Put`: dedups by request id, overwrites the local record,
    /// and — if this replica is the primary for the key — forwards the
    /// same request to the rest of the preference list.
    #[tracing::instrument(skip_all, fields(server = self.id, key = %args.key, id = args.id))]
    pub fn handle_put(&self, args: PutAppendArgs) -> ServerResult<PutAppendReply> {
        let list = self.require_membership(&args.key)?;

        if let Some(_reply) = self.record_seen(args.id) {
            tracing::debug!(server = self.id, id = args.id, "duplicate PUT, dedup hit");
            return Ok(PutAppendReply(String::new()));
        }

        let ts = self.clock.now();
        {
            let mut kv = self.kv.lock().expect("kv mutex poisoned");
            kv.insert(
                args.key.clone(),
                ValueRecord::new(args.value.clone(), ts, args.id),
            );
        }

        if self.id == self.config.primary_of(&args.key) {
            for &peer_id in &list {
                if peer_id != self.id {
                    self.forward(peer_id, &args, Forward::Put);
                }
            }
        }

        Ok(PutAppendReply(args.value))
    }

    /// Handles an `Append`: dedups by request id (replaying the exact
    /// cached pre-append reply on retry), merges with peers via a local
    /// read-repairing `Get`, extends the merged payload, and — as
    /// primary — forwards to the rest of the preference list.
    #[tracing::instrument(skip_all, fields(server = self.id, key = %args.key, id = args.id))]
    pub fn handle_append(&self, args: PutAppendArgs) -> ServerResult<PutAppendReply> {
        let list = self.require_membership(&args.key)?;

        if let Some(reply) = self.record_seen(args.id) {
            if let Some(reply) = reply {
                tracing::debug!(
                    server = self.id,
                    id = args.id,
                    "duplicate APPEND, replaying cached reply"
                );
                return Ok(PutAppendReply(reply));
            }
            // Recorded but no reply yet: a genuinely concurrent duplicate
            // delivery of the same id arrived while the first is still
            // in flight. Retries from a single Clerk are always sequential,
            // so this path falls through and re-applies rather than
            // blocking for the in-flight reply.
        }

        let merged: ValueRecord = self
            .handle_get(GetArgs::client(args.key.clone(), args.id))?
            .into();
        let old_payload = merged.payload;

        if merged.last_writer_id != args.id {
            let ts = self.clock.now();
            let mut kv = self.kv.lock().expect("kv mutex poisoned");
            kv.insert(
                args.key.clone(),
                ValueRecord::new(format!("{old_payload}{}", args.value), ts, args.id),
            );
        }

        {
            let mut seen = self.seen.lock().expect("seen mutex poisoned");
            seen.set_reply(args.id, old_payload.clone());
        }

        if self.id == self.config.primary_of(&args.key) {
            for &peer_id in &list {
                if peer_id != self.id {
                    self.forward(peer_id, &args, Forward::Append);
                }
            }
        }

        Ok(PutAppendReply(old_payload))
    }

    /// Consults/records `id` in the dedup table. `Some(reply)` means `id`
    /// was already seen (`reply` is the cached Append reply, or `None` if
    /// it was a Put or if an Append's reply hasn't been cached yet).
    /// `None` means `id` is new and has just been recorded.
    fn record_seen(&self, id: u64) -> Option<Option<String>> {
        let mut seen = self.seen.lock().expect("seen mutex poisoned");
        seen.check(id)
    }

    fn forward(&self, peer_id: usize, args: &PutAppendArgs, op: Forward) {
        for attempt in 1..=MAX_FORWARD_ATTEMPTS {
            let result = match op {
                Forward::Put => self.peer(peer_id).put(args.clone()),
                Forward::Append => self.peer(peer_id).append(args.clone()),
            };
            match result {
                Ok(_) => return,
                Err(RpcError::Timeout) => {
                    tracing::debug!(
                        server = self.id,
                        peer = peer_id,
                        attempt,
                        op = op.as_str(),
                        "forward timed out, retrying"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        server = self.id,
                        peer = peer_id,
                        op = op.as_str(),
                        %err,
                        "forward failed with a non-recoverable error"
                    );
                    return;
                }
            }
        }
        tracing::warn!(
            server = self.id,
            peer = peer_id,
            op = op.as_str(),
            "forward abandoned after exhausting retries"
        );
    }
}

#[derive(Clone, Copy)]
enum Forward {
    Put,
    Append,
}

impl Forward {
    fn as_str(self) -> &'static str {
        match self {
            Forward::Put => "put",
            Forward::Append => "append",
        }
    }
}

/// Selects the last-writer-wins candidate: largest `ts` strictly wins,
/// ties keep the earlier candidate (the caller collects local-first, then
/// peers in preference-list order, so "earlier" means "closer to primary").
fn merge_last_writer_wins(candidates: Vec<ValueRecord>) -> ValueRecord {
    let mut winner_idx = 0;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.ts > candidates[winner_idx].ts {
            winner_idx = i;
        }
    }
    candidates.into_iter().nth(winner_idx).expect("non-empty")
}

impl PeerClient for ReplicaServer {
    fn get(&self, args: GetArgs) -> RpcResult<GetReply> {
        self.handle_get(args).map_err(to_rpc_error)
    }

    fn put(&self, args: PutAppendArgs) -> RpcResult<PutAppendReply> {
        self.handle_put(args).map_err(to_rpc_error)
    }

    fn append(&self, args: PutAppendArgs) -> RpcResult<PutAppendReply> {
        self.handle_append(args).map_err(to_rpc_error)
    }
}

fn to_rpc_error(err: ServerError) -> RpcError {
    RpcError::Other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_breaks_ties_by_earlier_candidate() {
        let a = ValueRecord::new("a", 5.0, 1);
        let b = ValueRecord::new("b", 5.0, 2);
        let winner = merge_last_writer_wins(vec![a.clone(), b]);
        assert_eq!(winner, a);
    }

    #[test]
    fn merge_picks_strictly_larger_timestamp() {
        let a = ValueRecord::new("a", 1.0, 1);
        let b = ValueRecord::new("b", 2.0, 2);
        let winner = merge_last_writer_wins(vec![a, b.clone()]);
        assert_eq!(winner, b);
    }
}
