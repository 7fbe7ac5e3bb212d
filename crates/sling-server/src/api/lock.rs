//! Lock and service lifecycle endpoints

use actix_web::{HttpResponse, web};
use serde_json::json;
use sling_common::{
    AcquireLockRequest, DeregisterLockRequest, DeregisterServiceRequest, LockResponse,
    RegisterLockRequest, RegisterServiceRequest, ReleaseLockRequest,
};
use sling_core::{LockManager, LockOutcome};

use crate::error::ApiError;

type ApiResult = Result<HttpResponse, ApiError>;

fn success(outcome: LockOutcome) -> HttpResponse {
    let request_id = uuid::Uuid::new_v4().to_string();
    let mut body = LockResponse::ok(request_id, outcome.message);
    if let Some(job_id) = outcome.job_id {
        body = body.with_job_id(job_id);
    }
    HttpResponse::Ok().json(body)
}

pub async fn acquire(
    manager: web::Data<LockManager>,
    body: web::Json<AcquireLockRequest>,
) -> ApiResult {
    let outcome = manager.acquire_lock(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn release(
    manager: web::Data<LockManager>,
    body: web::Json<ReleaseLockRequest>,
) -> ApiResult {
    let outcome = manager.release_lock(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn register_lock(
    manager: web::Data<LockManager>,
    body: web::Json<RegisterLockRequest>,
) -> ApiResult {
    let outcome = manager.register_lock(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn deregister_lock(
    manager: web::Data<LockManager>,
    body: web::Json<DeregisterLockRequest>,
) -> ApiResult {
    let outcome = manager.deregister_lock(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn register_service(
    manager: web::Data<LockManager>,
    body: web::Json<RegisterServiceRequest>,
) -> ApiResult {
    let outcome = manager.register_service(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn deregister_service(
    manager: web::Data<LockManager>,
    body: web::Json<DeregisterServiceRequest>,
) -> ApiResult {
    let outcome = manager.deregister_service(body.into_inner()).await?;
    Ok(success(outcome))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "UP" }))
}
