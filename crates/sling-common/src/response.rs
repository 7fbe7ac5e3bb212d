//! Response bodies for the lock endpoints

use serde::{Deserialize, Serialize};

/// Metadata returned with every successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(rename = "RequestId")]
    pub request_id: String,
    #[serde(rename = "HTTPStatusCode")]
    pub http_status_code: u16,
    #[serde(rename = "Message")]
    pub message: String,
    /// Only present on a successful acquire
    #[serde(rename = "JobId", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Success body: `{"ResponseMetadata": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResponse {
    #[serde(rename = "ResponseMetadata")]
    pub response_metadata: ResponseMetadata,
}

impl LockResponse {
    pub fn ok(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            response_metadata: ResponseMetadata {
                request_id: request_id.into(),
                http_status_code: 200,
                message: message.into(),
                job_id: None,
            },
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.response_metadata.job_id = Some(job_id.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.response_metadata.message
    }

    pub fn job_id(&self) -> Option<&str> {
        self.response_metadata.job_id.as_deref()
    }
}

pub const BAD_REQUEST_CODE: &str = "BadRequestError";

/// Error body: `{"Message": "..."}`, with `Code` set on request-shape errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Code", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: Some(BAD_REQUEST_CODE.to_string()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_response_shape() {
        let resp = LockResponse::ok("req-1", "svc acquired the following lock: deploy")
            .with_job_id("job-1");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ResponseMetadata"]["JobId"], "job-1");
        assert_eq!(json["ResponseMetadata"]["HTTPStatusCode"], 200);
        assert_eq!(
            json["ResponseMetadata"]["Message"],
            "svc acquired the following lock: deploy"
        );
    }

    #[test]
    fn test_job_id_omitted_when_absent() {
        let resp = LockResponse::ok("req-2", "Registered Lock: deploy");
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["ResponseMetadata"].get("JobId").is_none());
    }

    #[test]
    fn test_error_body_shapes() {
        let json = serde_json::to_value(ErrorBody::new("Unable to release lock")).unwrap();
        assert_eq!(json, serde_json::json!({"Message": "Unable to release lock"}));

        let json = serde_json::to_value(ErrorBody::bad_request("bad")).unwrap();
        assert_eq!(json["Code"], "BadRequestError");
    }
}
