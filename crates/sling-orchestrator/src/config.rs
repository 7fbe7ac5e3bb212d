//! Orchestrator configuration
//!
//! Loaded from `conf/orchestrator.yml` (or `--config`), with `SLING_`
//! environment variables overriding individual keys, e.g.
//! `SLING_REPO_OWNER` or `SLING_SECRETS__DIR`.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use serde::Deserialize;
use sling_common::logging::{LogSettings, LoggingConfig};
use sling_common::{AcquireLockRequest, ReleaseLockRequest};

use crate::error::Result;
use crate::review::{MergeMethod, MergeOptions};

pub const DEFAULT_CONFIG_FILE: &str = "conf/orchestrator.yml";
pub const DEFAULT_RUN_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const ORCHESTRATOR_LOG_FILE: &str = "sling-orchestrator.log";

#[derive(Debug, Parser)]
#[command(name = "sling-orchestrator", about = "Lock-serialized pull request merger")]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
    /// Run a single pass and exit
    #[arg(long = "once")]
    pub once: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    #[default]
    File,
    Env,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretSettings {
    #[serde(default)]
    pub provider: SecretSource,
    #[serde(default = "default_secret_dir")]
    pub dir: String,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            provider: SecretSource::default(),
            dir: default_secret_dir(),
        }
    }
}

fn default_secret_dir() -> String {
    "conf/secrets".to_string()
}

fn default_run_interval() -> u64 {
    DEFAULT_RUN_INTERVAL_MINUTES
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    pub repo_owner: String,
    pub repo_name: String,
    pub merge_label: String,
    pub commit_msg: String,
    pub commit_title: String,
    pub merge_type: MergeMethod,

    pub service_name: String,
    pub lock_name: String,
    pub lock_table_name: String,
    pub service_table_name: String,
    pub log_table_name: String,
    /// Base route of the lock API. Blank means not configured.
    #[serde(default)]
    pub api_route: String,

    pub secret_name: String,
    #[serde(default)]
    pub region_name: String,

    #[serde(default = "default_run_interval")]
    pub run_interval_minutes: u64,
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// Read timeout for both the lock API and the review system
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub secrets: SecretSettings,
    #[serde(default)]
    pub logs: LogSettings,
}

impl OrchestratorConfig {
    pub fn load(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SLING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn run_interval(&self) -> Duration {
        Duration::from_secs(self.run_interval_minutes.max(1) * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            commit_title: self.commit_title.clone(),
            commit_message: self.commit_msg.clone(),
            merge_method: self.merge_type,
        }
    }

    pub fn acquire_request(&self) -> AcquireLockRequest {
        AcquireLockRequest {
            service_name: Some(self.service_name.clone()),
            lock_name: Some(self.lock_name.clone()),
            lock_table_name: Some(self.lock_table_name.clone()),
            service_table_name: Some(self.service_table_name.clone()),
        }
    }

    pub fn release_request(&self, job_id: &str) -> ReleaseLockRequest {
        ReleaseLockRequest {
            lock_name: Some(self.lock_name.clone()),
            service_name: Some(self.service_name.clone()),
            job_id: Some(job_id.to_string()),
            lock_table_name: Some(self.lock_table_name.clone()),
            log_table_name: Some(self.log_table_name.clone()),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_settings(ORCHESTRATOR_LOG_FILE, &self.logs)
    }
}
