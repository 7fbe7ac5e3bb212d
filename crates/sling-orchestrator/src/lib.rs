//! Sling Orchestrator - merges approved pull requests while holding a lock
//!
//! On every tick the orchestrator lists open pull requests, keeps the ones
//! carrying the merge label with a trusted approval, and merges them while
//! holding a named lock from the Sling lock server. Overlapping ticks and
//! other bots sharing the lock are serialized by the lock server alone.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod review;
pub mod runner;
pub mod scheduler;
pub mod secrets;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use orchestrator::{Orchestrator, RunOutcome, RunState};
pub use runner::MergeBot;
