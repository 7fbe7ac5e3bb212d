//! Sling Core - the lock protocol
//!
//! [`LockManager`] implements the six lock and service lifecycle operations.
//! It keeps no state between calls: each operation validates its request and
//! then issues exactly one transaction against the injected
//! [`LockStore`](sling_store::LockStore). Concurrent callers on the same name
//! are serialized by the store alone.

pub mod item;
pub mod manager;

pub use manager::{LockManager, LockOutcome};
