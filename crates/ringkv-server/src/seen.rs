use std::collections::{HashMap, VecDeque};

use ringkv_types::RequestId;

/// Default dedup horizon: the number of recent request ids a replica
/// remembers before the oldest is evicted to bound memory use.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded FIFO set of request ids a replica has already applied.
///
/// Beyond plain membership, this also caches the exact reply an `Append`
/// produced for a given id, so a retried `Append` can replay it verbatim
/// instead of re-deriving it by stripping the appended suffix out of the
/// current payload, which would be unsound whenever the appended value
/// recurs inside the stored payload (see `DESIGN.md`). `Put` ids are
/// recorded with no reply (`None`) since a duplicate `Put` always replies
/// with an empty string regardless.
pub struct SeenTable {
    order: VecDeque<RequestId>,
    replies: HashMap<RequestId, Option<String>>,
    capacity: usize,
}

impl SeenTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            replies: HashMap::new(),
            capacity,
        }
    }

    /// If `id` has already been recorded, returns its cached reply (which
    /// may itself be `None` if the first handler call hasn't finished
    /// computing one yet). If `id` is new, records it and returns `None`.
    pub fn check(&mut self, id: RequestId) -> Option<Option<String>> {
        if let Some(reply) = self.replies.get(&id) {
            return Some(reply.clone());
        }
        self.insert(id);
        None
    }

    /// Caches the reply a handler computed for a previously-recorded id.
    pub fn set_reply(&mut self, id: RequestId, reply: String) {
        if let Some(slot) = self.replies.get_mut(&id) {
            *slot = Some(reply);
        }
    }

    fn insert(&mut self, id: RequestId) {
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.replies.remove(&oldest);
            }
        }
        self.order.push_back(id);
        self.replies.insert(id, None);
    }
}

impl Default for SeenTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
