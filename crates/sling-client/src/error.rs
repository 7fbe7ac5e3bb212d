//! Error types for the lock client

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid lock API route '{route}': {source}")]
    InvalidRoute {
        route: String,
        #[source]
        source: url::ParseError,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Status code of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
