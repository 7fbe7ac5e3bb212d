//! Lock server HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use sling_common::{
    AcquireLockRequest, DeregisterLockRequest, DeregisterServiceRequest, ErrorBody, LockResponse,
    PATH_ACQUIRE, PATH_DEREGISTER_LOCK, PATH_DEREGISTER_SERVICE, PATH_REGISTER_LOCK,
    PATH_REGISTER_SERVICE, PATH_RELEASE, RegisterLockRequest, RegisterServiceRequest,
    ReleaseLockRequest,
};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};

/// Configuration for the lock client
#[derive(Clone, Debug)]
pub struct LockClientConfig {
    /// Base route of the lock API, e.g. `https://locks.internal/prod/`
    pub api_route: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for LockClientConfig {
    fn default() -> Self {
        Self {
            api_route: "http://127.0.0.1:8080/".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
        }
    }
}

impl LockClientConfig {
    pub fn new(api_route: &str) -> Self {
        Self {
            api_route: api_route.to_string(),
            ..Default::default()
        }
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }
}

/// The two lock operations the merge orchestrator needs
#[async_trait]
pub trait LockApi: Send + Sync {
    async fn acquire(&self, request: AcquireLockRequest) -> Result<LockResponse>;

    async fn release(&self, request: ReleaseLockRequest) -> Result<LockResponse>;
}

/// HTTP client for the lock server
#[derive(Clone, Debug)]
pub struct LockClient {
    client: Client,
    base: Url,
}

impl LockClient {
    pub fn new(config: LockClientConfig) -> Result<Self> {
        let base = base_url(&config.api_route)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;
        Ok(Self { client, base })
    }

    pub async fn register_lock(&self, request: RegisterLockRequest) -> Result<LockResponse> {
        self.post(PATH_REGISTER_LOCK, &request).await
    }

    pub async fn deregister_lock(&self, request: DeregisterLockRequest) -> Result<LockResponse> {
        self.post(PATH_DEREGISTER_LOCK, &request).await
    }

    pub async fn register_service(&self, request: RegisterServiceRequest) -> Result<LockResponse> {
        self.post(PATH_REGISTER_SERVICE, &request).await
    }

    pub async fn deregister_service(
        &self,
        request: DeregisterServiceRequest,
    ) -> Result<LockResponse> {
        self.post(PATH_DEREGISTER_SERVICE, &request).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidRoute {
                route: self.base.to_string(),
                source,
            })
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<LockResponse> {
        let url = self.endpoint(path)?;
        debug!(%url, "Calling lock API");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        decode_response(status, &bytes)
    }
}

#[async_trait]
impl LockApi for LockClient {
    async fn acquire(&self, request: AcquireLockRequest) -> Result<LockResponse> {
        self.post(PATH_ACQUIRE, &request).await
    }

    async fn release(&self, request: ReleaseLockRequest) -> Result<LockResponse> {
        self.post(PATH_RELEASE, &request).await
    }
}

/// Parse the configured route, treating it as a directory so endpoint paths
/// are appended rather than replacing its last segment.
fn base_url(route: &str) -> Result<Url> {
    let route = route.trim();
    let normalized = if route.ends_with('/') {
        route.to_string()
    } else {
        format!("{}/", route)
    };
    Url::parse(&normalized).map_err(|source| ClientError::InvalidRoute {
        route: route.to_string(),
        source,
    })
}

fn decode_response(status: u16, body: &[u8]) -> Result<LockResponse> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()));
    }
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
    Err(ClientError::Rejected { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_to_route() {
        let client = LockClient::new(LockClientConfig::new("https://locks.example.com/prod")).unwrap();
        assert_eq!(
            client.endpoint(PATH_ACQUIRE).unwrap().as_str(),
            "https://locks.example.com/prod/acquire"
        );

        let client = LockClient::new(LockClientConfig::new("http://127.0.0.1:8080/")).unwrap();
        assert_eq!(
            client.endpoint(PATH_RELEASE).unwrap().as_str(),
            "http://127.0.0.1:8080/release"
        );
    }

    #[test]
    fn test_invalid_route() {
        let err = LockClient::new(LockClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRoute { .. }));
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{"ResponseMetadata":{"RequestId":"r-1","HTTPStatusCode":200,"Message":"svc acquired the following lock: l","JobId":"j-1"}}"#;
        let response = decode_response(200, body).unwrap();
        assert_eq!(response.job_id(), Some("j-1"));
        assert_eq!(response.message(), "svc acquired the following lock: l");
    }

    #[test]
    fn test_decode_rejection_carries_server_message() {
        let err = decode_response(409, br#"{"Message":"Unable to release lock"}"#).unwrap_err();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Unable to release lock");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_rejection_with_plain_body() {
        let err = decode_response(502, b"Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "server returned 502: Bad Gateway");
    }

    #[test]
    fn test_decode_garbage_success_body() {
        let err = decode_response(200, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
