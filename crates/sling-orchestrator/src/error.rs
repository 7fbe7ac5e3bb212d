//! Error types for the merge orchestrator

use sling_client::ClientError;

#[derive(thiserror::Error, Debug)]
pub enum OrchestratorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("secret '{name}' unavailable: {reason}")]
    Secret { name: String, reason: String },

    #[error("lock API error: {0}")]
    LockApi(#[from] ClientError),

    #[error("review system error: {0}")]
    ReviewSystem(String),

    /// The review system refused to merge one pull request
    #[error("merge of pull request #{number} failed: {reason}")]
    Merge { number: u64, reason: String },
}

impl From<config::ConfigError> for OrchestratorError {
    fn from(value: config::ConfigError) -> Self {
        OrchestratorError::Config(value.to_string())
    }
}

impl From<reqwest::Error> for OrchestratorError {
    fn from(value: reqwest::Error) -> Self {
        OrchestratorError::ReviewSystem(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
