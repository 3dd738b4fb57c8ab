/// A request identifier minted by the Clerk for every call.
///
/// 62 random bits; kept as a plain `u64` rather than a newtype since it
/// never needs to carry behavior beyond equality and hashing.
pub type RequestId = u64;

/// The value stored for a key: payload, write timestamp, and the id of the
/// request that produced it.
///
/// `ts == 0.0` is reserved for the "absent key" sentinel (see
/// [`ValueRecord::absent`]) and must never be produced by an actual write —
/// the read-repair merge relies on the zero timestamp always losing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRecord {
    pub payload: String,
    pub ts: f64,
    pub last_writer_id: RequestId,
}

impl ValueRecord {
    pub fn new(payload: impl Into<String>, ts: f64, last_writer_id: RequestId) -> Self {
        Self {
            payload: payload.into(),
            ts,
            last_writer_id,
        }
    }

    /// The sentinel returned for a key that has never been written anywhere.
    /// The zero timestamp guarantees it never wins a read-repair merge.
    pub fn absent(request_id: RequestId) -> Self {
        Self::new(String::new(), 0.0, request_id)
    }

    pub fn is_absent(&self) -> bool {
        self.ts == 0.0
    }
}
