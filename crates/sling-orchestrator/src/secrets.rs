//! Credential retrieval
//!
//! A secret is either a JSON string or base64-encoded JSON bytes. Both
//! decode to [`GithubCredentials`].

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::error::{OrchestratorError, Result};
use crate::review::GithubAuth;

/// Raw secret payload as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretValue {
    String(String),
    /// Base64 text of the secret bytes
    Binary(String),
}

#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret(&self, name: &str, region: &str) -> Result<SecretValue>;
}

#[derive(Clone, Deserialize)]
pub struct GithubCredentials {
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub github_password: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
}

impl GithubCredentials {
    pub fn decode(name: &str, value: &SecretValue) -> Result<Self> {
        let invalid = |reason: String| OrchestratorError::Secret {
            name: name.to_string(),
            reason,
        };
        let bytes = match value {
            SecretValue::String(s) => s.as_bytes().to_vec(),
            SecretValue::Binary(b64) => STANDARD
                .decode(b64.trim())
                .map_err(|e| invalid(format!("invalid base64: {}", e)))?,
        };
        serde_json::from_slice(&bytes).map_err(|e| invalid(format!("invalid JSON: {}", e)))
    }

    /// A token wins over username and password when both are present.
    pub fn auth(&self) -> Option<GithubAuth> {
        if let Some(token) = self.github_token.as_ref().filter(|t| !t.is_empty()) {
            return Some(GithubAuth::Token(token.clone()));
        }
        match (&self.github_username, &self.github_password) {
            (Some(username), Some(password)) => Some(GithubAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

fn env_key(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("SLING_SECRET_{}", normalized)
}

/// Secrets from `SLING_SECRET_<NAME>` variables. A `_B64` suffixed variable
/// holds a binary secret.
#[derive(Debug, Default, Clone)]
pub struct EnvSecretProvider;

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, name: &str, _region: &str) -> Result<SecretValue> {
        let key = env_key(name);
        if let Ok(value) = std::env::var(&key) {
            return Ok(SecretValue::String(value));
        }
        if let Ok(value) = std::env::var(format!("{}_B64", key)) {
            return Ok(SecretValue::Binary(value));
        }
        Err(OrchestratorError::Secret {
            name: name.to_string(),
            reason: format!("environment variable {} is not set", key),
        })
    }
}

/// Secrets from files under a directory, partitioned by region when a
/// region directory exists: `<dir>[/<region>]/<name>.json` for string
/// secrets, `<name>.b64` for binary ones.
#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    dir: PathBuf,
}

impl FileSecretProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self, name: &str, region: &str) -> Vec<(PathBuf, bool)> {
        let mut roots = Vec::new();
        if !region.is_empty() {
            roots.push(self.dir.join(region));
        }
        roots.push(self.dir.clone());
        roots
            .into_iter()
            .flat_map(|root| {
                [
                    (root.join(format!("{}.json", name)), false),
                    (root.join(format!("{}.b64", name)), true),
                ]
            })
            .collect()
    }
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn get_secret(&self, name: &str, region: &str) -> Result<SecretValue> {
        for (path, binary) in self.candidates(name, region) {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) if binary => return Ok(SecretValue::Binary(content)),
                Ok(content) => return Ok(SecretValue::String(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(OrchestratorError::Secret {
                        name: name.to_string(),
                        reason: format!("{}: {}", path.display(), e),
                    });
                }
            }
        }
        Err(OrchestratorError::Secret {
            name: name.to_string(),
            reason: format!("no secret file under {}", self.dir.display()),
        })
    }
}
