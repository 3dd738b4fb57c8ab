//! RPC argument and reply payloads for the three `KVServer` methods
//! (`Get`, `Put`, `Append`).
//!
//! These are plain serde-derived structs — the in-process transport used by
//! `ringkv-rpc`/`ringkv-cluster` never actually serializes them, but shaping
//! them this way keeps the door open for a real wire transport without
//! touching the protocol layer in `ringkv-server`/`ringkv-client`.

use ringkv_types::{RequestId, ValueRecord};
use serde::{Deserialize, Serialize};

/// Arguments for a `Get` RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetArgs {
    pub key: String,
    pub id: RequestId,
    /// `true` for a client-originated call (perform the read-repair merge);
    /// `false` for a peer-internal call (return local state only).
    pub pre_merge: bool,
}

impl GetArgs {
    pub fn client(key: impl Into<String>, id: RequestId) -> Self {
        Self {
            key: key.into(),
            id,
            pre_merge: true,
        }
    }

    pub fn peer_internal(key: impl Into<String>, id: RequestId) -> Self {
        Self {
            key: key.into(),
            id,
            pre_merge: false,
        }
    }
}

/// Reply to a `Get` RPC: the full value triple.
///
/// Clients extract only `payload`; servers keep the triple around
/// internally (Append needs `ts`/`last_writer_id` from the merge result).
///
/// This is `ringkv-wire`'s own serializable shape, not `ringkv_types::
/// ValueRecord` directly — `ringkv-types` stays serde-agnostic, so the
/// conversion happens at this crate's boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetReply {
    pub payload: String,
    pub ts: f64,
    pub last_writer_id: RequestId,
}

impl From<ValueRecord> for GetReply {
    fn from(record: ValueRecord) -> Self {
        Self {
            payload: record.payload,
            ts: record.ts,
            last_writer_id: record.last_writer_id,
        }
    }
}

impl From<GetReply> for ValueRecord {
    fn from(reply: GetReply) -> Self {
        ValueRecord::new(reply.payload, reply.ts, reply.last_writer_id)
    }
}

/// Arguments shared by `Put` and `Append`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutAppendArgs {
    pub key: String,
    pub value: String,
    pub id: RequestId,
}

impl PutAppendArgs {
    pub fn new(key: impl Into<String>, value: impl Into<String>, id: RequestId) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            id,
        }
    }
}

/// Reply to a `Put` or `Append` RPC.
///
/// For `Put` this echoes the written value (or `""` on a dedup hit). For
/// `Append` this is the payload as it stood immediately before this append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutAppendReply(pub String);
