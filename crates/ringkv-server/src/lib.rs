//! The replica server: placement membership checks, the `kv`/`seen` state,
//! the Get/Put/Append handlers, and primary-coordinated fan-out.
//!
//! This is the hard, interesting core of the replicated store. Everything
//! here is synchronous and thread-safe: a [`ReplicaServer`] is handed to
//! many worker threads as an `Arc`, and each RPC handler call runs to
//! completion on whichever thread received it.

mod error;
mod seen;
mod server;

pub use error::{ServerError, ServerResult};
pub use seen::{SeenTable, DEFAULT_CAPACITY};
pub use server::ReplicaServer;
