//! Review system abstraction: where pull requests come from and get merged

pub mod filter;
pub mod github;
pub mod model;

use async_trait::async_trait;
use futures::stream::BoxStream;

pub use filter::{has_label, has_trusted_approval, select_mergeable};
pub use github::{GithubAuth, GithubClient};
pub use model::{Label, MergeMethod, MergeOptions, PullRequest, Review};

use crate::error::Result;

/// Open pull requests, produced lazily and consumed once
pub type PullRequestStream<'a> = BoxStream<'a, Result<PullRequest>>;

#[async_trait]
pub trait ReviewSystem: Send + Sync {
    fn pull_requests(&self) -> PullRequestStream<'_>;

    async fn reviews(&self, pr: &PullRequest) -> Result<Vec<Review>>;

    async fn merge(&self, pr: &PullRequest, options: &MergeOptions) -> Result<()>;
}
