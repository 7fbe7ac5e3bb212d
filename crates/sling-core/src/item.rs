//! Conversions between records and store items

use sling_common::model::{
    HELD_BY, JOB_ID, LOCK_ACQUIRE_DATE_TIME, LOCK_NAME, LOCK_RELEASE_DATE_TIME, SERVICE_NAME,
};
use sling_common::{AuditLogRecord, LockRecord, ServiceRecord};
use sling_store::{Item, item};

fn attribute(item: &Item, name: &str) -> String {
    item.get(name).cloned().unwrap_or_default()
}

pub fn lock_to_item(lock: &LockRecord) -> Item {
    item([
        (LOCK_NAME, lock.lock_name.as_str()),
        (HELD_BY, lock.held_by.as_str()),
        (JOB_ID, lock.job_id.as_str()),
        (LOCK_ACQUIRE_DATE_TIME, lock.acquire_date_time.as_str()),
    ])
}

pub fn lock_from_item(item: &Item) -> LockRecord {
    LockRecord {
        lock_name: attribute(item, LOCK_NAME),
        held_by: attribute(item, HELD_BY),
        job_id: attribute(item, JOB_ID),
        acquire_date_time: attribute(item, LOCK_ACQUIRE_DATE_TIME),
    }
}

pub fn service_to_item(service: &ServiceRecord) -> Item {
    item([(SERVICE_NAME, service.service_name.as_str())])
}

pub fn audit_to_item(record: &AuditLogRecord) -> Item {
    item([
        (JOB_ID, record.job_id.as_str()),
        (LOCK_NAME, record.lock_name.as_str()),
        (SERVICE_NAME, record.service_name.as_str()),
        (LOCK_ACQUIRE_DATE_TIME, record.lock_acquire_date_time.as_str()),
        (LOCK_RELEASE_DATE_TIME, record.lock_release_date_time.as_str()),
    ])
}

#[cfg(test)]
pub fn audit_from_item(item: &Item) -> AuditLogRecord {
    AuditLogRecord {
        job_id: attribute(item, JOB_ID),
        lock_name: attribute(item, LOCK_NAME),
        service_name: attribute(item, SERVICE_NAME),
        lock_acquire_date_time: attribute(item, LOCK_ACQUIRE_DATE_TIME),
        lock_release_date_time: attribute(item, LOCK_RELEASE_DATE_TIME),
    }
}
