//! Configuration management for the lock server
//!
//! Values are layered: built-in defaults, then `conf/application.yml` (or the
//! file given with `--config`), then `SLING_` environment variables, then
//! command line flags.

use clap::Parser;
use config::{Config, Environment};
use sling_common::logging::{LogSettings, LoggingConfig};
use sling_common::model::{JOB_ID, LOCK_NAME, SERVICE_NAME};
use sling_store::TableSpec;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const SERVER_LOG_FILE: &str = "sling.log";

const ENV_PREFIX: &str = "SLING";

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "sling-server", about = "Named-lock HTTP server")]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
    #[arg(short = 'p', long = "port", env = "SLING_SERVER_PORT")]
    pub port: Option<u16>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process command line.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        Ok(Self {
            config: builder.build()?,
        })
    }

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Path prefix for every endpoint, empty by default
    pub fn context_path(&self) -> String {
        self.config
            .get_string("server.context_path")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    pub fn metrics_enabled(&self) -> bool {
        self.config.get_bool("metrics.enabled").unwrap_or(true)
    }

    /// Tables to provision in the in-process store
    pub fn tables(&self) -> Vec<TableSpec> {
        self.config
            .get::<Vec<TableSpec>>("store.tables")
            .unwrap_or_else(|_| default_tables())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        let settings = self
            .config
            .get::<LogSettings>("logs")
            .unwrap_or_default();
        LoggingConfig::from_settings(SERVER_LOG_FILE, &settings)
    }
}

pub fn default_tables() -> Vec<TableSpec> {
    vec![
        TableSpec::new("Locks", LOCK_NAME),
        TableSpec::new("Services", SERVICE_NAME),
        TableSpec::new("LockLogs", JOB_ID),
    ]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli(path: &str) -> Cli {
        Cli {
            config: path.to_string(),
            port: None,
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let configuration = Configuration::from_cli(cli("/nonexistent/sling.yml")).unwrap();
        assert_eq!(configuration.server_address(), DEFAULT_SERVER_ADDRESS);
        assert_eq!(configuration.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(configuration.context_path(), "");
        assert!(configuration.metrics_enabled());
        assert_eq!(configuration.tables(), default_tables());
    }

    #[test]
    fn test_values_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(
            file,
            r#"
server:
  address: 127.0.0.1
  port: 9100
  context_path: /sling/
metrics:
  enabled: false
store:
  tables:
    - name: DeployLocks
      key_attribute: LockName
logs:
  level: debug
  console: false
"#
        )
        .unwrap();

        let configuration =
            Configuration::from_cli(cli(file.path().to_str().unwrap())).unwrap();
        assert_eq!(configuration.server_address(), "127.0.0.1");
        assert_eq!(configuration.server_port(), 9100);
        assert_eq!(configuration.context_path(), "/sling");
        assert!(!configuration.metrics_enabled());
        assert_eq!(
            configuration.tables(),
            vec![TableSpec::new("DeployLocks", LOCK_NAME)]
        );
        let logging = configuration.logging_config();
        assert!(!logging.console_output);
        assert_eq!(logging.file_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_port_flag_overrides_file() {
        let configuration = Configuration::from_cli(Cli {
            config: "/nonexistent/sling.yml".to_string(),
            port: Some(7001),
        })
        .unwrap();
        assert_eq!(configuration.server_port(), 7001);
    }
}
