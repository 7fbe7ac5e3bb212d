//! Sling Common - Shared records, wire types, and errors
//!
//! This crate provides the foundational types used across all Sling components:
//! - Lock, service and audit log records with their attribute names
//! - HTTP request and response bodies for the lock endpoints
//! - The lock error taxonomy
//! - Timestamp formatting
//! - File-based logging setup shared by the binaries

pub mod error;
pub mod logging;
pub mod model;
pub mod request;
pub mod response;
pub mod utils;

// Re-exports for convenience
pub use error::{LockError, Operation};
pub use model::{AuditLogRecord, LockRecord, ServiceRecord};
pub use request::{
    AcquireLockRequest, DeregisterLockRequest, DeregisterServiceRequest, RegisterLockRequest,
    RegisterServiceRequest, ReleaseLockRequest,
};
pub use response::{ErrorBody, LockResponse, ResponseMetadata};
pub use utils::now_timestamp;

/// Sentinel stored in `HeldBy` and `JobId` while a lock is free
pub const EMPTY_SENTINEL: &str = "";

/// Endpoint paths exposed by the lock server
pub const PATH_ACQUIRE: &str = "/acquire";
pub const PATH_RELEASE: &str = "/release";
pub const PATH_REGISTER_LOCK: &str = "/register_lock";
pub const PATH_DEREGISTER_LOCK: &str = "/deregister_lock";
pub const PATH_REGISTER_SERVICE: &str = "/register_service";
pub const PATH_DEREGISTER_SERVICE: &str = "/deregister_service";
pub const PATH_HEALTH: &str = "/health";
