//! Request bodies for the lock endpoints
//!
//! Each request deserializes with every field optional so that absent fields
//! can be reported together. [`validate`](AcquireLockRequest::validate)
//! turns a request into its fully-populated params struct or a
//! [`LockError::MissingFields`] listing the absent fields in declaration order.

use serde::{Deserialize, Serialize};

use crate::error::LockError;

/// Declares a request body, its validated params struct, and the conversion
/// between them. Field order is the order used in missing-field messages.
macro_rules! lock_request {
    (
        $(#[$meta:meta])*
        $request:ident => $params:ident {
            $( $field:ident : $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $request {
            $(
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )+
        }

        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $params {
            $( pub $field: String, )+
        }

        impl $request {
            /// Wire names of the required fields, in declaration order
            pub const REQUIRED_FIELDS: &'static [&'static str] = &[$( $wire ),+];

            pub fn validate(self) -> Result<$params, LockError> {
                let missing: Vec<String> = [$( ($wire, self.$field.is_none()) ),+]
                    .into_iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| name.to_string())
                    .collect();
                if !missing.is_empty() {
                    return Err(LockError::MissingFields(missing));
                }
                Ok($params {
                    $( $field: self.$field.unwrap_or_default(), )+
                })
            }
        }

        impl From<$params> for $request {
            fn from(params: $params) -> Self {
                Self {
                    $( $field: Some(params.$field), )+
                }
            }
        }
    };
}

lock_request! {
    /// POST /acquire
    AcquireLockRequest => AcquireLockParams {
        service_name: "ServiceName",
        lock_name: "LockName",
        lock_table_name: "LockTableName",
        service_table_name: "ServiceTableName",
    }
}

lock_request! {
    /// POST /release
    ReleaseLockRequest => ReleaseLockParams {
        lock_name: "LockName",
        service_name: "ServiceName",
        job_id: "JobId",
        lock_table_name: "LockTableName",
        log_table_name: "LogTableName",
    }
}

lock_request! {
    /// POST /register_lock
    RegisterLockRequest => RegisterLockParams {
        lock_name: "LockName",
        lock_table_name: "LockTableName",
    }
}

lock_request! {
    /// POST /deregister_lock
    DeregisterLockRequest => DeregisterLockParams {
        lock_name: "LockName",
        lock_table_name: "LockTableName",
    }
}

lock_request! {
    /// POST /register_service
    RegisterServiceRequest => RegisterServiceParams {
        service_name: "ServiceName",
        service_table_name: "ServiceTableName",
    }
}

lock_request! {
    /// POST /deregister_service
    DeregisterServiceRequest => DeregisterServiceParams {
        service_name: "ServiceName",
        service_table_name: "ServiceTableName",
    }
}
