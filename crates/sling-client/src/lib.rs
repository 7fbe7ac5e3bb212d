//! Sling Client - talks to the lock server over HTTP
//!
//! [`LockClient`] covers all six endpoints. The merge orchestrator depends
//! only on the [`LockApi`] trait so tests can substitute a fake.

mod client;
mod error;

pub use client::{LockApi, LockClient, LockClientConfig};
pub use error::{ClientError, Result};
