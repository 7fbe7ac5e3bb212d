//! One merge run: discover, filter, acquire, merge, release

use std::sync::Arc;

use sling_client::LockApi;
use sling_common::logging::ALERT_TARGET;
use tracing::{debug, error, info, warn};

use crate::config::OrchestratorConfig;
use crate::review::{PullRequest, ReviewSystem, select_mergeable};

/// Stages of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Discovering,
    Filtering,
    Acquiring,
    Merging,
    Releasing,
    Done,
    Failed,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No pull request qualified; the lock was not touched
    NothingToMerge,
    /// No lock API route configured; the lock was not touched
    Misconfigured,
    /// The lock server refused the acquire
    LockDenied { reason: String },
    Completed {
        job_id: String,
        merged: Vec<u64>,
        failed: Vec<u64>,
        /// False when the release was rejected; the lock stays held
        released: bool,
    },
    /// A fault before the lock was taken
    Failed { reason: String },
}

pub struct Orchestrator {
    config: Arc<OrchestratorConfig>,
    reviews: Arc<dyn ReviewSystem>,
    /// `None` when no lock API route is configured
    locks: Option<Arc<dyn LockApi>>,
}

impl Orchestrator {
    pub fn new(
        config: Arc<OrchestratorConfig>,
        reviews: Arc<dyn ReviewSystem>,
        locks: Option<Arc<dyn LockApi>>,
    ) -> Self {
        Self {
            config,
            reviews,
            locks,
        }
    }

    fn enter(&self, state: RunState) {
        debug!(?state, lock = %self.config.lock_name, "Run state");
    }

    pub async fn run(&self) -> RunOutcome {
        self.enter(RunState::Idle);

        self.enter(RunState::Discovering);
        let pull_requests = self.reviews.pull_requests();

        self.enter(RunState::Filtering);
        let mergeable = match select_mergeable(
            self.reviews.as_ref(),
            pull_requests,
            &self.config.merge_label,
        )
        .await
        {
            Ok(prs) => prs,
            Err(e) => return self.fail(e.to_string()),
        };
        if mergeable.is_empty() {
            info!("Nothing to do here");
            self.enter(RunState::Done);
            return RunOutcome::NothingToMerge;
        }

        self.enter(RunState::Acquiring);
        let locks = match &self.locks {
            Some(locks) if !self.config.api_route.trim().is_empty() => locks,
            _ => {
                error!(
                    target: ALERT_TARGET,
                    "No REST API URL found in config. Endpoint configured incorrectly or inaccessible"
                );
                self.enter(RunState::Done);
                return RunOutcome::Misconfigured;
            }
        };
        let job_id = match locks.acquire(self.config.acquire_request()).await {
            Ok(response) => match response.job_id() {
                Some(job_id) => job_id.to_string(),
                None => return self.fail("acquire response carried no JobId".to_string()),
            },
            Err(e) => {
                warn!(error = %e, lock = %self.config.lock_name, "Failed to acquire lock");
                self.enter(RunState::Done);
                return RunOutcome::LockDenied {
                    reason: e.to_string(),
                };
            }
        };
        info!(job_id = %job_id, "Acquired lock successfully");

        self.enter(RunState::Merging);
        let (merged, failed) = self.merge_all(&mergeable).await;
        info!(?merged, "Merged the following pull requests");
        if !failed.is_empty() {
            warn!(?failed, "Failed to merge the following pull requests");
        }

        self.enter(RunState::Releasing);
        let released = match locks.release(self.config.release_request(&job_id)).await {
            Ok(_) => {
                info!(job_id = %job_id, "Released lock successfully");
                true
            }
            Err(e) => {
                error!(
                    target: ALERT_TARGET,
                    job_id = %job_id,
                    "For JobId: {} :Failed to release lock: {}",
                    job_id,
                    e
                );
                false
            }
        };

        self.enter(RunState::Done);
        RunOutcome::Completed {
            job_id,
            merged,
            failed,
            released,
        }
    }

    /// Merge sequentially. One failure does not stop the others.
    async fn merge_all(&self, mergeable: &[PullRequest]) -> (Vec<u64>, Vec<u64>) {
        let options = self.config.merge_options();
        let mut merged = Vec::new();
        let mut failed = Vec::new();
        for pr in mergeable {
            match self.reviews.merge(pr, &options).await {
                Ok(()) => {
                    info!(number = pr.number, "Successfully merged pull request");
                    merged.push(pr.number);
                }
                Err(e) => {
                    warn!(number = pr.number, error = %e, "Unable to merge pull request");
                    failed.push(pr.number);
                }
            }
        }
        (merged, failed)
    }

    fn fail(&self, reason: String) -> RunOutcome {
        self.enter(RunState::Failed);
        error!(target: ALERT_TARGET, reason = %reason, "Merge run failed");
        RunOutcome::Failed { reason }
    }
}
