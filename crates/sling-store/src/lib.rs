//! Sling Store - the key-value backend the lock protocol runs against
//!
//! The lock protocol needs exactly two things from its store:
//! - a consistent multi-item read ([`LockStore::transact_get`])
//! - an all-or-nothing multi-item write where each item can be guarded by a
//!   [`Condition`] ([`LockStore::transact_write`])
//!
//! Every lock lifecycle operation is one call to one of these. The store is
//! the only place where concurrent callers are serialized.

mod memory;
mod model;

pub use memory::MemoryLockStore;
pub use model::{Condition, GetOp, Item, TableSpec, WriteOp, item};

use async_trait::async_trait;

/// Store-level failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A guarded write's condition did not hold; nothing was applied
    #[error("transaction cancelled: conditional check failed on operation {index}")]
    ConditionalCheckFailed { index: usize },

    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// A key attribute value was the empty string
    #[error("empty value for key attribute of table '{table}'")]
    EmptyKey { table: String },

    /// The request itself was malformed (missing key attribute, duplicate keys)
    #[error("validation error: {0}")]
    Validation(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// The store refused the request for reasons the caller controls
    /// (a failed condition or an empty key), as opposed to a backend fault
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            StoreError::ConditionalCheckFailed { .. } | StoreError::EmptyKey { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Transactional key-value store
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Read several items as one consistent snapshot. Absent items are `None`.
    async fn transact_get(&self, gets: Vec<GetOp>) -> Result<Vec<Option<Item>>>;

    /// Apply every write or none of them.
    async fn transact_write(&self, writes: Vec<WriteOp>) -> Result<()>;
}
