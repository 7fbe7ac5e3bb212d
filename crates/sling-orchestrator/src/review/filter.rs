//! Pull request selection

use futures::StreamExt;
use tracing::{debug, warn};

use super::model::{Label, PullRequest, Review};
use super::{PullRequestStream, ReviewSystem};
use crate::error::Result;

pub const APPROVED: &str = "APPROVED";

/// Reviewer associations whose approval counts
pub const TRUSTED_ASSOCIATIONS: &[&str] = &["COLLABORATOR", "MEMBER", "OWNER"];

pub fn has_label(labels: &[Label], merge_label: &str) -> bool {
    labels.iter().any(|label| label.name == merge_label)
}

pub fn has_trusted_approval(reviews: &[Review]) -> bool {
    reviews.iter().any(|review| {
        review.state == APPROVED
            && TRUSTED_ASSOCIATIONS.contains(&review.author_association.as_str())
    })
}

/// Drain `pull_requests` once, keeping the ones carrying `merge_label` with
/// at least one trusted approval. Reviews are only fetched for labeled
/// pull requests.
pub async fn select_mergeable(
    system: &dyn ReviewSystem,
    mut pull_requests: PullRequestStream<'_>,
    merge_label: &str,
) -> Result<Vec<PullRequest>> {
    let mut mergeable = Vec::new();
    while let Some(pr) = pull_requests.next().await {
        let pr = pr?;
        if !has_label(&pr.labels, merge_label) {
            continue;
        }
        let reviews = system.reviews(&pr).await?;
        if has_trusted_approval(&reviews) {
            debug!(number = pr.number, "Pull request qualifies for merge");
            mergeable.push(pr);
        } else {
            warn!(
                id = pr.id,
                number = pr.number,
                "Pull request has the merge label but no approving review"
            );
        }
    }
    Ok(mergeable)
}
