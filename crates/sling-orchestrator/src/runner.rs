//! Per-tick wiring: fetch credentials, connect to the review system, run

use std::sync::Arc;

use sling_client::{LockApi, LockClient, LockClientConfig};
use sling_common::logging::ALERT_TARGET;
use tracing::{error, info};

use crate::config::{OrchestratorConfig, SecretSource};
use crate::error::{OrchestratorError, Result};
use crate::orchestrator::{Orchestrator, RunOutcome};
use crate::review::GithubClient;
use crate::secrets::{EnvSecretProvider, FileSecretProvider, GithubCredentials, SecretProvider};

/// Everything a run needs that outlives a single run
#[derive(Clone)]
pub struct MergeBot {
    config: Arc<OrchestratorConfig>,
    secrets: Arc<dyn SecretProvider>,
    locks: Option<Arc<dyn LockApi>>,
}

impl MergeBot {
    pub fn new(
        config: Arc<OrchestratorConfig>,
        secrets: Arc<dyn SecretProvider>,
        locks: Option<Arc<dyn LockApi>>,
    ) -> Self {
        Self {
            config,
            secrets,
            locks,
        }
    }

    /// Build from configuration alone.
    pub fn from_config(config: OrchestratorConfig) -> Result<Self> {
        let secrets: Arc<dyn SecretProvider> = match config.secrets.provider {
            SecretSource::File => Arc::new(FileSecretProvider::new(&config.secrets.dir)),
            SecretSource::Env => Arc::new(EnvSecretProvider),
        };
        let locks = lock_api(&config)?;
        Ok(Self::new(Arc::new(config), secrets, locks))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Credentials are fetched on every run so a rotated secret takes effect
    /// on the next tick.
    pub async fn run_once(&self) -> RunOutcome {
        let outcome = match self.connect().await {
            Ok(orchestrator) => orchestrator.run().await,
            Err(e) => {
                error!(target: ALERT_TARGET, error = %e, "Merge run could not start");
                RunOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        info!(?outcome, "Merge run finished");
        outcome
    }

    async fn connect(&self) -> Result<Orchestrator> {
        let config = &self.config;
        let secret = self
            .secrets
            .get_secret(&config.secret_name, &config.region_name)
            .await?;
        let credentials = GithubCredentials::decode(&config.secret_name, &secret)?;
        let auth = credentials.auth().ok_or_else(|| OrchestratorError::Secret {
            name: config.secret_name.clone(),
            reason: "neither github_token nor github_username/github_password present".to_string(),
        })?;
        let github = GithubClient::new(
            &config.github_api_url,
            &config.repo_owner,
            &config.repo_name,
            auth,
            config.request_timeout(),
        )?;
        Ok(Orchestrator::new(
            config.clone(),
            Arc::new(github),
            self.locks.clone(),
        ))
    }
}

/// Lock client for the configured route, or `None` when the route is blank.
/// A route that is set but unparseable is a startup error.
pub fn lock_api(config: &OrchestratorConfig) -> Result<Option<Arc<dyn LockApi>>> {
    let route = config.api_route.trim();
    if route.is_empty() {
        return Ok(None);
    }
    let timeout_ms = config.request_timeout_secs * 1000;
    let client = LockClient::new(LockClientConfig::new(route).with_timeouts(5000, timeout_ms))?;
    Ok(Some(Arc::new(client)))
}
