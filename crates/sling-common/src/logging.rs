//! File-based logging shared by the lock server and the orchestrator.
//!
//! Each binary writes a root log file with every event plus component files
//! routed by `tracing` target, all with daily rotation:
//!
//! | Log File           | Component                          | Target Prefixes                    |
//! |--------------------|------------------------------------|------------------------------------|
//! | `<root>.log`       | Root logger (all components)       | (all)                              |
//! | lock-manager.log   | Lock protocol                      | sling_core                         |
//! | store.log          | Backing store                      | sling_store                        |
//! | access.log         | HTTP access lines                  | actix_web::middleware::logger      |
//! | orchestrator.log   | Merge runs                         | sling_orchestrator, sling_client   |
//! | alert.log          | Conditions that must page someone  | sling::alert                       |
//!
//! Log files are stored in `~/sling/logs` by default.
//! Override with the `SLING_LOG_DIR` environment variable or the `logs.path` config key.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Target for events an operator must act on (a lock left held, a
/// misconfigured endpoint). Kept in its own file so alerting can watch it.
pub const ALERT_TARGET: &str = "sling::alert";

struct ComponentLogDef {
    file_name: &'static str,
    targets: &'static [&'static str],
}

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "lock-manager.log",
        targets: &["sling_core"],
    },
    ComponentLogDef {
        file_name: "store.log",
        targets: &["sling_store"],
    },
    ComponentLogDef {
        file_name: "access.log",
        targets: &["actix_web::middleware::logger"],
    },
    ComponentLogDef {
        file_name: "orchestrator.log",
        targets: &["sling_orchestrator", "sling_client", ALERT_TARGET],
    },
    ComponentLogDef {
        file_name: "alert.log",
        targets: &[ALERT_TARGET],
    },
];

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

impl std::str::FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(LogRotation::Daily),
            "hourly" => Ok(LogRotation::Hourly),
            "never" => Ok(LogRotation::Never),
            other => Err(format!("unknown log rotation '{}'", other)),
        }
    }
}

/// Logging configuration for one binary
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Root log file name, e.g. `sling-server.log`
    pub root_file: String,
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/sling/logs", home))
}

impl LoggingConfig {
    pub fn new(root_file: impl Into<String>) -> Self {
        Self {
            root_file: root_file.into(),
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }

    /// Create from environment variables.
    pub fn from_env(root_file: impl Into<String>) -> Self {
        let log_dir = std::env::var("SLING_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_dir());

        let console_output = std::env::var("SLING_LOG_CONSOLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let file_logging = std::env::var("SLING_LOG_FILE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(true);

        let console_level = std::env::var("SLING_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::INFO);

        Self {
            log_dir,
            console_output,
            console_level,
            file_logging,
            file_level: console_level,
            ..Self::new(root_file)
        }
    }

    /// Environment defaults overlaid with the `logs` section of a config file.
    pub fn from_settings(root_file: impl Into<String>, settings: &LogSettings) -> Self {
        let mut config = Self::from_env(root_file);
        if let Some(path) = &settings.path {
            config.log_dir = PathBuf::from(path);
        }
        if let Some(console) = settings.console {
            config.console_output = console;
        }
        if let Some(file) = settings.file {
            config.file_logging = file;
        }
        if let Some(level) = settings.level.as_deref().and_then(|l| l.parse().ok()) {
            config.console_level = level;
            config.file_level = level;
        }
        if let Some(rotation) = settings.rotation.as_deref() {
            config.rotation = rotation.parse().unwrap_or(LogRotation::Daily);
        }
        config
    }
}

/// The `logs` section of a configuration file. Unset keys keep the
/// environment or built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSettings {
    pub path: Option<String>,
    pub console: Option<bool>,
    pub file: Option<bool>,
    pub level: Option<String>,
    pub rotation: Option<String>,
}

/// Keeps the non-blocking file writers alive. Dropping it flushes buffered output.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Initialize console output, the root log file, and the component log files.
///
/// `RUST_LOG` overrides the configured level for the console and root file.
/// Component files capture everything from their targets.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let root_appender = RollingFileAppender::new(
            config.rotation.into(),
            &config.log_dir,
            &config.root_file,
        );
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        let root_layer = fmt::layer()
            .with_writer(root_nb)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(root_filter);
        layers.push(Box::new(root_layer));

        for component in COMPONENT_LOGS {
            let appender = RollingFileAppender::new(
                config.rotation.into(),
                &config.log_dir,
                component.file_name,
            );
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let layer = fmt::layer()
                .with_writer(nb)
                .with_target(true)
                .with_ansi(false)
                .with_filter(component_filter(component));
            layers.push(Box::new(layer));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            "File logging initialized: {} (root) + {} component log files",
            config.root_file,
            COMPONENT_LOGS.len()
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

fn component_filter(component: &ComponentLogDef) -> Targets {
    component
        .targets
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, LevelFilter::TRACE)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::new("sling-server.log");
        assert_eq!(config.root_file, "sling-server.log");
        assert!(config.console_output);
        assert!(config.file_logging);
        assert_eq!(config.console_level, Level::INFO);
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_logging_config_from_settings() {
        let settings = LogSettings {
            path: Some("/tmp/sling-test-logs".to_string()),
            console: Some(false),
            file: None,
            level: Some("debug".to_string()),
            rotation: Some("hourly".to_string()),
        };
        let config = LoggingConfig::from_settings("sling-orchestrator.log", &settings);
        assert_eq!(config.root_file, "sling-orchestrator.log");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/sling-test-logs"));
        assert!(!config.console_output);
        assert_eq!(config.file_level, Level::DEBUG);
        assert_eq!(config.rotation, LogRotation::Hourly);
    }

    #[test]
    fn test_unknown_rotation_falls_back_to_daily() {
        let settings = LogSettings {
            level: Some("nonsense".to_string()),
            rotation: Some("weekly".to_string()),
            ..Default::default()
        };
        let config = LoggingConfig::from_settings("x.log", &settings);
        assert_eq!(config.rotation, LogRotation::Daily);
        assert_eq!(config.root_file, "x.log");
    }

    #[test]
    fn test_log_settings_deserialize_partial() {
        let settings: LogSettings = serde_json::from_str(r#"{"level": "warn"}"#).unwrap();
        assert_eq!(settings.level.as_deref(), Some("warn"));
        assert!(settings.path.is_none());
    }

    #[test]
    fn test_component_log_definitions() {
        for component in COMPONENT_LOGS {
            assert!(component.file_name.ends_with(".log"));
            assert!(!component.targets.is_empty());
        }
        assert!(
            COMPONENT_LOGS
                .iter()
                .any(|c| c.targets.contains(&ALERT_TARGET))
        );
    }

    fn component(file_name: &str) -> &'static ComponentLogDef {
        COMPONENT_LOGS
            .iter()
            .find(|c| c.file_name == file_name)
            .unwrap()
    }

    #[test]
    fn test_alerts_reach_orchestrator_and_alert_logs() {
        let orchestrator = component_filter(component("orchestrator.log"));
        assert!(orchestrator.would_enable(ALERT_TARGET, &Level::ERROR));
        assert!(orchestrator.would_enable("sling_orchestrator::orchestrator", &Level::INFO));
        assert!(orchestrator.would_enable("sling_client::client", &Level::DEBUG));
        assert!(!orchestrator.would_enable("sling_core::manager", &Level::INFO));

        let alert = component_filter(component("alert.log"));
        assert!(alert.would_enable(ALERT_TARGET, &Level::ERROR));
        assert!(!alert.would_enable("sling_orchestrator::orchestrator", &Level::ERROR));
    }
}
