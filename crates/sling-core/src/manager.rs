//! Lock manager implementation

use std::sync::Arc;

use sling_common::model::{HELD_BY, JOB_ID, LOCK_ACQUIRE_DATE_TIME, LOCK_NAME, SERVICE_NAME};
use sling_common::request::{
    AcquireLockParams, DeregisterLockParams, DeregisterServiceParams, RegisterLockParams,
    RegisterServiceParams, ReleaseLockParams,
};
use sling_common::{
    AcquireLockRequest, AuditLogRecord, DeregisterLockRequest, DeregisterServiceRequest,
    EMPTY_SENTINEL, LockError, LockRecord, Operation, RegisterLockRequest, RegisterServiceRequest,
    ReleaseLockRequest, ServiceRecord, now_timestamp,
};
use sling_store::{Condition, GetOp, LockStore, StoreError, WriteOp};
use tracing::{debug, error, info};

use crate::item::{audit_to_item, lock_from_item, lock_to_item, service_to_item};

/// Result of a successful lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    pub message: String,
    /// Set only by a successful acquire
    pub job_id: Option<String>,
}

impl LockOutcome {
    fn message(message: String) -> Self {
        Self {
            message,
            job_id: None,
        }
    }
}

type LockResult = Result<LockOutcome, LockError>;

/// Condition under which a lock counts as free
fn lock_is_free() -> Condition {
    Condition::equals(HELD_BY, EMPTY_SENTINEL).and(Condition::equals(JOB_ID, EMPTY_SENTINEL))
}

/// Stateless lock and service lifecycle manager
#[derive(Clone)]
pub struct LockManager {
    store: Arc<dyn LockStore>,
}

impl LockManager {
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self { store }
    }

    /// Take the named lock for a registered service
    pub async fn acquire_lock(&self, request: AcquireLockRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.acquire(params).await,
            Err(e) => Err(e),
        };
        record(Operation::Acquire, &result);
        result
    }

    /// Free the named lock and append its audit record, atomically
    pub async fn release_lock(&self, request: ReleaseLockRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.release(params).await,
            Err(e) => Err(e),
        };
        record(Operation::Release, &result);
        result
    }

    pub async fn register_lock(&self, request: RegisterLockRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.create_lock(params).await,
            Err(e) => Err(e),
        };
        record(Operation::RegisterLock, &result);
        result
    }

    /// Remove a lock. Only a free lock can be removed.
    pub async fn deregister_lock(&self, request: DeregisterLockRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.delete_lock(params).await,
            Err(e) => Err(e),
        };
        record(Operation::DeregisterLock, &result);
        result
    }

    pub async fn register_service(&self, request: RegisterServiceRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.create_service(params).await,
            Err(e) => Err(e),
        };
        record(Operation::RegisterService, &result);
        result
    }

    /// Remove a service.
    ///
    /// Succeeds whenever the service exists, even if it still holds a lock.
    /// The lock keeps its `HeldBy` reference and can still be released by
    /// the job that took it.
    pub async fn deregister_service(&self, request: DeregisterServiceRequest) -> LockResult {
        let result = match request.validate() {
            Ok(params) => self.delete_service(params).await,
            Err(e) => Err(e),
        };
        record(Operation::DeregisterService, &result);
        result
    }

    async fn acquire(&self, params: AcquireLockParams) -> LockResult {
        let services = self
            .store
            .transact_get(vec![GetOp::new(
                &params.service_table_name,
                &params.service_name,
            )])
            .await
            .map_err(|e| {
                store_failure(Operation::Acquire, e, LockError::LockConflict(Operation::Acquire))
            })?;
        if !matches!(services.first(), Some(Some(_))) {
            debug!(service = %params.service_name, "Acquire rejected: service doesn't exist");
            return Err(LockError::ServiceNotFound);
        }

        let job_id = uuid::Uuid::new_v4().to_string();
        let write = WriteOp::Update {
            table: params.lock_table_name.clone(),
            key: params.lock_name.clone(),
            set: vec![
                (HELD_BY.to_string(), params.service_name.clone()),
                (LOCK_ACQUIRE_DATE_TIME.to_string(), now_timestamp()),
                (JOB_ID.to_string(), job_id.clone()),
            ],
            condition: Some(lock_is_free()),
        };
        self.write(Operation::Acquire, write, LockError::LockConflict(Operation::Acquire))
            .await?;

        info!(
            lock = %params.lock_name,
            service = %params.service_name,
            job_id = %job_id,
            "Lock acquired"
        );
        Ok(LockOutcome {
            message: format!(
                "{} acquired the following lock: {}",
                params.service_name, params.lock_name
            ),
            job_id: Some(job_id),
        })
    }

    async fn release(&self, params: ReleaseLockParams) -> LockResult {
        // Current record is read only to carry the acquire time into the audit log
        let current = self
            .store
            .transact_get(vec![GetOp::new(&params.lock_table_name, &params.lock_name)])
            .await
            .map_err(|e| {
                store_failure(Operation::Release, e, LockError::LockConflict(Operation::Release))
            })?;
        let acquired_at = current
            .into_iter()
            .next()
            .flatten()
            .map(|item| lock_from_item(&item).acquire_date_time)
            .unwrap_or_default();

        let audit = AuditLogRecord {
            job_id: params.job_id.clone(),
            lock_name: params.lock_name.clone(),
            service_name: params.service_name.clone(),
            lock_acquire_date_time: acquired_at,
            lock_release_date_time: now_timestamp(),
        };
        let writes = vec![
            WriteOp::Put {
                table: params.log_table_name.clone(),
                item: audit_to_item(&audit),
                condition: None,
            },
            WriteOp::Update {
                table: params.lock_table_name.clone(),
                key: params.lock_name.clone(),
                set: vec![
                    (HELD_BY.to_string(), EMPTY_SENTINEL.to_string()),
                    (JOB_ID.to_string(), EMPTY_SENTINEL.to_string()),
                ],
                condition: Some(
                    Condition::equals(HELD_BY, &params.service_name)
                        .and(Condition::equals(JOB_ID, &params.job_id)),
                ),
            },
        ];
        self.transact(
            Operation::Release,
            writes,
            LockError::LockConflict(Operation::Release),
        )
        .await?;

        info!(
            lock = %params.lock_name,
            service = %params.service_name,
            job_id = %params.job_id,
            "Lock released"
        );
        Ok(LockOutcome::message(format!(
            "{} released the following lock: {} with JobId: {}",
            params.service_name, params.lock_name, params.job_id
        )))
    }

    async fn create_lock(&self, params: RegisterLockParams) -> LockResult {
        let lock = LockRecord::free(&params.lock_name, now_timestamp());
        let write = WriteOp::Put {
            table: params.lock_table_name.clone(),
            item: lock_to_item(&lock),
            condition: Some(Condition::attribute_not_exists(LOCK_NAME)),
        };
        self.write(
            Operation::RegisterLock,
            write,
            LockError::AlreadyExists(Operation::RegisterLock),
        )
        .await?;

        info!(lock = %params.lock_name, "Lock registered");
        Ok(LockOutcome::message(format!(
            "Registered Lock: {}",
            params.lock_name
        )))
    }

    async fn delete_lock(&self, params: DeregisterLockParams) -> LockResult {
        let write = WriteOp::Delete {
            table: params.lock_table_name.clone(),
            key: params.lock_name.clone(),
            condition: Some(lock_is_free()),
        };
        self.write(Operation::DeregisterLock, write, LockError::NotFree)
            .await?;

        info!(lock = %params.lock_name, "Lock deregistered");
        Ok(LockOutcome::message(format!(
            "Deregistered Lock: {}",
            params.lock_name
        )))
    }

    async fn create_service(&self, params: RegisterServiceParams) -> LockResult {
        let service = ServiceRecord::new(&params.service_name);
        let write = WriteOp::Put {
            table: params.service_table_name.clone(),
            item: service_to_item(&service),
            condition: Some(Condition::attribute_not_exists(SERVICE_NAME)),
        };
        self.write(
            Operation::RegisterService,
            write,
            LockError::AlreadyExists(Operation::RegisterService),
        )
        .await?;

        info!(service = %params.service_name, "Service registered");
        Ok(LockOutcome::message(format!(
            "Registered Service: {}",
            params.service_name
        )))
    }

    async fn delete_service(&self, params: DeregisterServiceParams) -> LockResult {
        // Key match only: held locks are not consulted
        let write = WriteOp::Delete {
            table: params.service_table_name.clone(),
            key: params.service_name.clone(),
            condition: Some(Condition::equals(SERVICE_NAME, &params.service_name)),
        };
        self.write(
            Operation::DeregisterService,
            write,
            LockError::ServiceNotRegistered,
        )
        .await?;

        info!(service = %params.service_name, "Service deregistered");
        Ok(LockOutcome::message(format!(
            "Deregistered Service: {}",
            params.service_name
        )))
    }

    async fn write(
        &self,
        operation: Operation,
        write: WriteOp,
        on_conflict: LockError,
    ) -> Result<(), LockError> {
        self.transact(operation, vec![write], on_conflict).await
    }

    async fn transact(
        &self,
        operation: Operation,
        writes: Vec<WriteOp>,
        on_conflict: LockError,
    ) -> Result<(), LockError> {
        self.store
            .transact_write(writes)
            .await
            .map_err(|e| store_failure(operation, e, on_conflict))
    }
}

/// A rejected request (failed condition, empty key) becomes `on_conflict`;
/// anything else is an internal error
fn store_failure(operation: Operation, e: StoreError, on_conflict: LockError) -> LockError {
    if e.is_rejected() {
        debug!(%operation, error = %e, "Store rejected request");
        return on_conflict;
    }
    internal(operation, e)
}

fn internal(operation: Operation, e: StoreError) -> LockError {
    error!(%operation, error = %e, "Unexpected store failure");
    LockError::internal(operation, e.to_string())
}

fn record(operation: Operation, result: &LockResult) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::counter!(
        "sling_lock_operations_total",
        "operation" => operation.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use sling_common::model::{LOCK_RELEASE_DATE_TIME, SERVICE_NAME};
    use sling_store::{Item, MemoryLockStore, TableSpec, item};

    use super::*;
    use crate::item::{audit_from_item, lock_from_item};

    const LOCKS: &str = "Locks";
    const SERVICES: &str = "Services";
    const LOGS: &str = "LockLogs";

    /// Store seeded with a free lock, a held lock, and two services
    async fn seeded() -> (LockManager, Arc<MemoryLockStore>) {
        let store = Arc::new(MemoryLockStore::with_tables(&[
            TableSpec::new(LOCKS, LOCK_NAME),
            TableSpec::new(SERVICES, SERVICE_NAME),
            TableSpec::new(LOGS, JOB_ID),
        ]));
        let seed = |table: &str, item: Item| WriteOp::Put {
            table: table.to_string(),
            item,
            condition: None,
        };
        store
            .transact_write(vec![
                seed(
                    LOCKS,
                    item([
                        (LOCK_NAME, "unheld_lock"),
                        (HELD_BY, ""),
                        (JOB_ID, ""),
                        (LOCK_ACQUIRE_DATE_TIME, ""),
                    ]),
                ),
                seed(
                    LOCKS,
                    item([
                        (LOCK_NAME, "held_lock"),
                        (HELD_BY, "held_service"),
                        (JOB_ID, "101"),
                        (LOCK_ACQUIRE_DATE_TIME, "2020"),
                    ]),
                ),
                seed(SERVICES, item([(SERVICE_NAME, "unheld_service")])),
                seed(SERVICES, item([(SERVICE_NAME, "held_service")])),
            ])
            .await
            .unwrap();
        (LockManager::new(store.clone()), store)
    }

    fn acquire_request(lock: &str, service: &str) -> AcquireLockRequest {
        AcquireLockParams {
            service_name: service.to_string(),
            lock_name: lock.to_string(),
            lock_table_name: LOCKS.to_string(),
            service_table_name: SERVICES.to_string(),
        }
        .into()
    }

    fn release_request(lock: &str, service: &str, job_id: &str) -> ReleaseLockRequest {
        ReleaseLockParams {
            lock_name: lock.to_string(),
            service_name: service.to_string(),
            job_id: job_id.to_string(),
            lock_table_name: LOCKS.to_string(),
            log_table_name: LOGS.to_string(),
        }
        .into()
    }

    fn lock_state(store: &MemoryLockStore, name: &str) -> Option<LockRecord> {
        store
            .scan(LOCKS)
            .unwrap()
            .iter()
            .map(lock_from_item)
            .find(|l| l.lock_name == name)
    }

    #[tokio::test]
    async fn test_acquire_free_lock() {
        let (manager, store) = seeded().await;
        let outcome = manager
            .acquire_lock(acquire_request("unheld_lock", "unheld_service"))
            .await
            .unwrap();

        assert_eq!(
            outcome.message,
            "unheld_service acquired the following lock: unheld_lock"
        );
        let job_id = outcome.job_id.unwrap();
        let lock = lock_state(&store, "unheld_lock").unwrap();
        assert!(lock.is_held_by("unheld_service", &job_id));
        assert!(!lock.acquire_date_time.is_empty());
    }

    #[tokio::test]
    async fn test_acquire_held_lock_conflicts() {
        let (manager, store) = seeded().await;
        let err = manager
            .acquire_lock(acquire_request("held_lock", "unheld_service"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::LockConflict(Operation::Acquire));
        let lock = lock_state(&store, "held_lock").unwrap();
        assert!(lock.is_held_by("held_service", "101"));
    }

    #[tokio::test]
    async fn test_acquire_nonexistent_lock_conflicts() {
        let (manager, store) = seeded().await;
        let err = manager
            .acquire_lock(acquire_request("doesn't exist", "unheld_service"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::LockConflict(Operation::Acquire));
        assert!(lock_state(&store, "doesn't exist").is_none());
    }

    #[tokio::test]
    async fn test_acquire_with_unknown_service() {
        let (manager, store) = seeded().await;
        let err = manager
            .acquire_lock(acquire_request("unheld_lock", "ghost"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::ServiceNotFound);
        assert!(lock_state(&store, "unheld_lock").unwrap().is_free());
    }

    #[tokio::test]
    async fn test_acquire_missing_fields() {
        let (manager, _) = seeded().await;
        let request = AcquireLockRequest {
            lock_name: Some("unheld_lock".to_string()),
            ..Default::default()
        };
        let err = manager.acquire_lock(request).await.unwrap_err();
        assert_eq!(
            err,
            LockError::MissingFields(vec![
                "ServiceName".to_string(),
                "LockTableName".to_string(),
                "ServiceTableName".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_acquire_unknown_table_is_internal() {
        let (manager, _) = seeded().await;
        let mut request = acquire_request("unheld_lock", "unheld_service");
        request.service_table_name = Some("NoSuchTable".to_string());
        let err = manager.acquire_lock(request).await.unwrap_err();
        assert!(matches!(err, LockError::Internal { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_release_held_lock_writes_audit_record() {
        let (manager, store) = seeded().await;
        let outcome = manager
            .release_lock(release_request("held_lock", "held_service", "101"))
            .await
            .unwrap();
        assert_eq!(
            outcome.message,
            "held_service released the following lock: held_lock with JobId: 101"
        );

        assert!(lock_state(&store, "held_lock").unwrap().is_free());
        let logs = store.scan(LOGS).unwrap();
        assert_eq!(logs.len(), 1);
        let audit = audit_from_item(&logs[0]);
        assert_eq!(audit.job_id, "101");
        assert_eq!(audit.lock_name, "held_lock");
        assert_eq!(audit.service_name, "held_service");
        assert_eq!(audit.lock_acquire_date_time, "2020");
        assert!(!logs[0][LOCK_RELEASE_DATE_TIME].is_empty());
    }

    #[tokio::test]
    async fn test_release_free_lock_conflicts_without_audit() {
        let (manager, store) = seeded().await;
        let err = manager
            .release_lock(release_request("unheld_lock", "unheld_service", "101"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::LockConflict(Operation::Release));
        assert!(store.scan(LOGS).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_release_with_wrong_job_id_or_holder() {
        let (manager, store) = seeded().await;
        for (service, job) in [("held_service", "999"), ("doesn't exist", "101")] {
            let err = manager
                .release_lock(release_request("held_lock", service, job))
                .await
                .unwrap_err();
            assert_eq!(err, LockError::LockConflict(Operation::Release));
        }
        assert!(store.scan(LOGS).unwrap().is_empty());
        assert!(
            lock_state(&store, "held_lock")
                .unwrap()
                .is_held_by("held_service", "101")
        );
    }

    #[tokio::test]
    async fn test_release_nonexistent_lock_conflicts() {
        let (manager, store) = seeded().await;
        let err = manager
            .release_lock(release_request("doesn't exist", "held_service", "101"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::LockConflict(Operation::Release));
        assert!(store.scan(LOGS).unwrap().is_empty());
        assert!(lock_state(&store, "doesn't exist").is_none());
    }

    #[tokio::test]
    async fn test_empty_names_conflict_and_leave_locks_untouched() {
        let (manager, store) = seeded().await;

        let err = manager
            .register_service(RegisterServiceRequest {
                service_name: Some(String::new()),
                service_table_name: Some(SERVICES.to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LockError::AlreadyExists(Operation::RegisterService));
        assert_eq!(err.status_code(), 409);

        let err = manager
            .register_lock(RegisterLockRequest {
                lock_name: Some(String::new()),
                lock_table_name: Some(LOCKS.to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LockError::AlreadyExists(Operation::RegisterLock));

        for (lock, service) in [("unheld_lock", ""), ("", "unheld_service")] {
            let err = manager
                .acquire_lock(acquire_request(lock, service))
                .await
                .unwrap_err();
            assert_eq!(err, LockError::LockConflict(Operation::Acquire));
        }
        assert!(lock_state(&store, "unheld_lock").unwrap().is_free());
        assert!(lock_state(&store, "").is_none());

        let err = manager
            .deregister_lock(DeregisterLockRequest {
                lock_name: Some(String::new()),
                lock_table_name: Some(LOCKS.to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LockError::NotFree);

        let err = manager
            .deregister_service(DeregisterServiceRequest {
                service_name: Some(String::new()),
                service_table_name: Some(SERVICES.to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LockError::ServiceNotRegistered);
    }

    #[tokio::test]
    async fn test_release_free_lock_with_empty_holder_and_job_conflicts() {
        let (manager, store) = seeded().await;
        for (lock, service, job) in [
            ("unheld_lock", "", ""),
            ("unheld_lock", "unheld_service", ""),
            ("", "held_service", "101"),
        ] {
            let err = manager
                .release_lock(release_request(lock, service, job))
                .await
                .unwrap_err();
            assert_eq!(err, LockError::LockConflict(Operation::Release));
        }
        assert!(store.scan(LOGS).unwrap().is_empty());
        assert!(lock_state(&store, "unheld_lock").unwrap().is_free());
        assert!(
            lock_state(&store, "held_lock")
                .unwrap()
                .is_held_by("held_service", "101")
        );
    }

    #[tokio::test]
    async fn test_acquire_then_release_cycle() {
        let (manager, store) = seeded().await;
        let job_id = manager
            .acquire_lock(acquire_request("unheld_lock", "unheld_service"))
            .await
            .unwrap()
            .job_id
            .unwrap();
        let acquired_at = lock_state(&store, "unheld_lock").unwrap().acquire_date_time;

        manager
            .release_lock(release_request("unheld_lock", "unheld_service", &job_id))
            .await
            .unwrap();

        let lock = lock_state(&store, "unheld_lock").unwrap();
        assert!(lock.is_free());
        assert_eq!(lock.acquire_date_time, acquired_at);
        let audit = audit_from_item(&store.scan(LOGS).unwrap()[0]);
        assert_eq!(audit.job_id, job_id);
        assert_eq!(audit.lock_acquire_date_time, acquired_at);
    }

    #[tokio::test]
    async fn test_register_lock_once() {
        let (manager, store) = seeded().await;
        let request = || RegisterLockRequest {
            lock_name: Some("fresh_lock".to_string()),
            lock_table_name: Some(LOCKS.to_string()),
        };
        let outcome = manager.register_lock(request()).await.unwrap();
        assert_eq!(outcome.message, "Registered Lock: fresh_lock");
        assert!(lock_state(&store, "fresh_lock").unwrap().is_free());

        let err = manager.register_lock(request()).await.unwrap_err();
        assert_eq!(err, LockError::AlreadyExists(Operation::RegisterLock));
    }

    #[tokio::test]
    async fn test_register_existing_lock_keeps_record() {
        let (manager, store) = seeded().await;
        let err = manager
            .register_lock(RegisterLockRequest {
                lock_name: Some("held_lock".to_string()),
                lock_table_name: Some(LOCKS.to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unable to register a lock");
        assert!(
            lock_state(&store, "held_lock")
                .unwrap()
                .is_held_by("held_service", "101")
        );
    }

    #[tokio::test]
    async fn test_deregister_lock() {
        let (manager, store) = seeded().await;
        let request = |name: &str| DeregisterLockRequest {
            lock_name: Some(name.to_string()),
            lock_table_name: Some(LOCKS.to_string()),
        };

        let err = manager
            .deregister_lock(request("held_lock"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::NotFree);
        assert!(lock_state(&store, "held_lock").is_some());

        let err = manager
            .deregister_lock(request("doesn't exist"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::NotFree);

        let outcome = manager
            .deregister_lock(request("unheld_lock"))
            .await
            .unwrap();
        assert_eq!(outcome.message, "Deregistered Lock: unheld_lock");
        assert!(lock_state(&store, "unheld_lock").is_none());
    }

    #[tokio::test]
    async fn test_register_service() {
        let (manager, _) = seeded().await;
        let request = |name: &str| RegisterServiceRequest {
            service_name: Some(name.to_string()),
            service_table_name: Some(SERVICES.to_string()),
        };
        let outcome = manager.register_service(request("new_service")).await.unwrap();
        assert_eq!(outcome.message, "Registered Service: new_service");

        let err = manager
            .register_service(request("unheld_service"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unable to register a service");
    }

    #[tokio::test]
    async fn test_deregister_service_holding_a_lock_succeeds() {
        let (manager, store) = seeded().await;
        let request = |name: &str| DeregisterServiceRequest {
            service_name: Some(name.to_string()),
            service_table_name: Some(SERVICES.to_string()),
        };

        let outcome = manager
            .deregister_service(request("held_service"))
            .await
            .unwrap();
        assert_eq!(outcome.message, "Deregistered Service: held_service");
        // The lock still names the deregistered service and can be released by it
        assert!(
            lock_state(&store, "held_lock")
                .unwrap()
                .is_held_by("held_service", "101")
        );
        manager
            .release_lock(release_request("held_lock", "held_service", "101"))
            .await
            .unwrap();

        let err = manager
            .deregister_service(request("held_service"))
            .await
            .unwrap_err();
        assert_eq!(err, LockError::ServiceNotRegistered);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_acquire_has_exactly_one_winner() {
        let (manager, store) = seeded().await;
        let attempts = (0..32).map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .acquire_lock(acquire_request("unheld_lock", "unheld_service"))
                    .await
            })
        });
        let results: Vec<LockResult> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners: Vec<&LockOutcome> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| *e == LockError::LockConflict(Operation::Acquire))
        );

        let winner_job = winners[0].job_id.as_deref().unwrap();
        let lock = lock_state(&store, "unheld_lock").unwrap();
        assert!(lock.is_held_by("unheld_service", winner_job));
    }
}
