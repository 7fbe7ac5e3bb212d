//! Lock, service, and audit log records
//!
//! Field names on the wire and in the store use the PascalCase attribute
//! names below.

use serde::{Deserialize, Serialize};

use crate::EMPTY_SENTINEL;

// Attribute names
pub const LOCK_NAME: &str = "LockName";
pub const SERVICE_NAME: &str = "ServiceName";
pub const HELD_BY: &str = "HeldBy";
pub const JOB_ID: &str = "JobId";
pub const LOCK_ACQUIRE_DATE_TIME: &str = "Lock_Acquire_DateTime";
pub const LOCK_RELEASE_DATE_TIME: &str = "Lock_Release_DateTime";

// Request-only attribute names
pub const LOCK_TABLE_NAME: &str = "LockTableName";
pub const SERVICE_TABLE_NAME: &str = "ServiceTableName";
pub const LOG_TABLE_NAME: &str = "LogTableName";

/// A named mutual-exclusion record
///
/// A lock is either free (`held_by` and `job_id` both empty) or held (both
/// set). The acquire timestamp survives a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    #[serde(rename = "LockName")]
    pub lock_name: String,
    #[serde(rename = "HeldBy", default)]
    pub held_by: String,
    #[serde(rename = "JobId", default)]
    pub job_id: String,
    #[serde(rename = "Lock_Acquire_DateTime", default)]
    pub acquire_date_time: String,
}

impl LockRecord {
    /// A free lock registered at `registered_at`
    pub fn free(lock_name: impl Into<String>, registered_at: impl Into<String>) -> Self {
        Self {
            lock_name: lock_name.into(),
            held_by: EMPTY_SENTINEL.to_string(),
            job_id: EMPTY_SENTINEL.to_string(),
            acquire_date_time: registered_at.into(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.held_by.is_empty() && self.job_id.is_empty()
    }

    pub fn is_held(&self) -> bool {
        !self.held_by.is_empty() && !self.job_id.is_empty()
    }

    pub fn is_held_by(&self, service_name: &str, job_id: &str) -> bool {
        self.is_held() && self.held_by == service_name && self.job_id == job_id
    }
}

/// A principal permitted to acquire locks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "ServiceName")]
    pub service_name: String,
}

impl ServiceRecord {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

/// Immutable record of one completed acquire/release cycle, keyed by job id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    #[serde(rename = "JobId")]
    pub job_id: String,
    #[serde(rename = "LockName")]
    pub lock_name: String,
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    #[serde(rename = "Lock_Acquire_DateTime", default)]
    pub lock_acquire_date_time: String,
    #[serde(rename = "Lock_Release_DateTime")]
    pub lock_release_date_time: String,
}
