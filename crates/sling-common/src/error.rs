//! Error taxonomy for the lock protocol
//!
//! Every lifecycle operation fails with exactly one [`LockError`] variant.
//! The variant determines the HTTP status and the message returned to the
//! caller; backend causes stay in the server logs.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The six lock/service lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Acquire,
    Release,
    RegisterLock,
    DeregisterLock,
    RegisterService,
    DeregisterService,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Acquire => "acquire",
            Operation::Release => "release",
            Operation::RegisterLock => "register_lock",
            Operation::DeregisterLock => "deregister_lock",
            Operation::RegisterService => "register_service",
            Operation::DeregisterService => "deregister_service",
        }
    }

    /// Message sent with a 409 for this operation
    pub fn conflict_message(self) -> &'static str {
        match self {
            Operation::Acquire => "Unable to acquire a lock",
            Operation::Release => "Unable to release lock",
            Operation::RegisterLock => "Unable to register a lock",
            Operation::DeregisterLock => "Unable to deregister a lock",
            Operation::RegisterService => "Unable to register a service",
            Operation::DeregisterService => "Unable to deregister a service",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const SERVICE_NOT_FOUND_MESSAGE: &str = "Service doesn't exist";
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected exception occurred during the request";

/// Domain outcome of a failed lock/service operation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("Missing the following fields in your request: {}", format_field_list(.0))]
    MissingFields(Vec<String>),

    #[error("{}", SERVICE_NOT_FOUND_MESSAGE)]
    ServiceNotFound,

    #[error("{}", .0.conflict_message())]
    LockConflict(Operation),

    #[error("{}", .0.conflict_message())]
    AlreadyExists(Operation),

    #[error("{}", Operation::DeregisterLock.conflict_message())]
    NotFree,

    #[error("{}", Operation::DeregisterService.conflict_message())]
    ServiceNotRegistered,

    #[error("internal error during {operation}: {cause}")]
    Internal { operation: Operation, cause: String },
}

impl LockError {
    pub fn internal(operation: Operation, cause: impl Into<String>) -> Self {
        LockError::Internal {
            operation,
            cause: cause.into(),
        }
    }

    /// HTTP status code for this outcome
    pub fn status_code(&self) -> u16 {
        match self {
            LockError::MissingFields(_) | LockError::ServiceNotFound => 400,
            LockError::LockConflict(_)
            | LockError::AlreadyExists(_)
            | LockError::NotFree
            | LockError::ServiceNotRegistered => 409,
            LockError::Internal { .. } => 500,
        }
    }

    /// Message safe to return to the caller. Internal causes are not exposed.
    pub fn public_message(&self) -> String {
        match self {
            LockError::Internal { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            LockError::MissingFields(_) => "missing_fields",
            LockError::ServiceNotFound => "service_not_found",
            LockError::LockConflict(_) => "lock_conflict",
            LockError::AlreadyExists(_) => "already_exists",
            LockError::NotFree => "not_free",
            LockError::ServiceNotRegistered => "service_not_registered",
            LockError::Internal { .. } => "internal_error",
        }
    }
}

/// Renders field names the way the missing-fields message lists them: `['A', 'B']`
fn format_field_list(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f)).collect();
    format!("[{}]", quoted.join(", "))
}
