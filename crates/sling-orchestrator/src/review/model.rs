use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An open pull request as listed by the review system
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    /// `APPROVED`, `COMMENTED`, `CHANGES_REQUESTED`, ...
    pub state: String,
    /// Reviewer's relationship to the repository: `OWNER`, `MEMBER`, ...
    pub author_association: String,
}

impl Review {
    pub fn new(state: impl Into<String>, author_association: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            author_association: author_association.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
}

impl MergeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeMethod::Merge => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        }
    }
}

/// Commit settings applied to every merge in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub commit_title: String,
    pub commit_message: String,
    pub merge_method: MergeMethod,
}
