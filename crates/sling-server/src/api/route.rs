// Lock API route configuration
// Maps HTTP routes to handler functions

use actix_web::web;
use sling_common::{
    PATH_ACQUIRE, PATH_DEREGISTER_LOCK, PATH_DEREGISTER_SERVICE, PATH_HEALTH, PATH_REGISTER_LOCK,
    PATH_REGISTER_SERVICE, PATH_RELEASE,
};

use crate::api::lock;
use crate::error::malformed_body;

/// Request bodies are parsed as JSON whatever their content type
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| malformed_body(err))
}

/// Configure the lock API routes under `context_path`
pub fn routes(context_path: &str) -> actix_web::Scope {
    web::scope(context_path)
        .app_data(json_config())
        .route(PATH_ACQUIRE, web::post().to(lock::acquire))
        .route(PATH_RELEASE, web::post().to(lock::release))
        .route(PATH_REGISTER_LOCK, web::post().to(lock::register_lock))
        .route(PATH_DEREGISTER_LOCK, web::post().to(lock::deregister_lock))
        .route(PATH_REGISTER_SERVICE, web::post().to(lock::register_service))
        .route(
            PATH_DEREGISTER_SERVICE,
            web::post().to(lock::deregister_service),
        )
        .route(PATH_HEALTH, web::get().to(lock::health))
}
