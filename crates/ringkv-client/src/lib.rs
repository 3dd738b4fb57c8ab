//! The Clerk: translates Get/Put/Append calls into RPCs against a
//! preference list, failing over between replicas on timeout.

mod clerk;
mod error;

pub use clerk::Clerk;
pub use error::{ClerkError, ClerkResult};
