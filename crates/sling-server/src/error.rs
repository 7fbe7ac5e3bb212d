// HTTP mapping for lock errors
// (LockError lives in sling-common, so the actix trait needs a local wrapper)

use std::fmt::{Display, Formatter};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sling_common::{ErrorBody, LockError};

#[derive(Debug)]
pub struct ApiError {
    inner: LockError,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<LockError> for ApiError {
    fn from(value: LockError) -> Self {
        ApiError { inner: value }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.inner.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.inner.public_message();
        let body = match self.inner {
            LockError::MissingFields(_) => ErrorBody::bad_request(message),
            _ => ErrorBody::new(message),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Body for requests that never reached a handler: unparseable JSON or
/// wrongly typed fields.
pub fn malformed_body(err: actix_web::error::JsonPayloadError) -> actix_web::Error {
    let body = ErrorBody::bad_request(format!("Invalid request body: {}", err));
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}
