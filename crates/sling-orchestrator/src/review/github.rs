//! GitHub REST implementation of [`ReviewSystem`]

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::model::{MergeOptions, PullRequest, Review};
use super::{PullRequestStream, ReviewSystem};
use crate::error::{OrchestratorError, Result};

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("sling-orchestrator/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Clone)]
pub enum GithubAuth {
    Basic { username: String, password: String },
    Token(String),
}

impl std::fmt::Debug for GithubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            GithubAuth::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Client for one repository
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api: Url,
    owner: String,
    repo: String,
    auth: GithubAuth,
}

impl GithubClient {
    pub fn new(
        api_url: &str,
        owner: &str,
        repo: &str,
        auth: GithubAuth,
        timeout: Duration,
    ) -> Result<Self> {
        let api = if api_url.ends_with('/') {
            Url::parse(api_url)
        } else {
            Url::parse(&format!("{}/", api_url))
        }
        .map_err(|e| OrchestratorError::Config(format!("invalid github_api_url: {}", e)))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api,
            owner: owner.to_string(),
            repo: repo.to_string(),
            auth,
        })
    }

    fn repo_url(&self, tail: &str) -> Result<Url> {
        self.api
            .join(&format!("repos/{}/{}/{}", self.owner, self.repo, tail))
            .map_err(|e| OrchestratorError::Config(format!("invalid repository path: {}", e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url).header(ACCEPT, GITHUB_JSON);
        match &self.auth {
            GithubAuth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            GithubAuth::Token(token) => builder.bearer_auth(token),
        }
    }

    async fn fetch_page<T: DeserializeOwned>(&self, mut url: Url, page: usize) -> Result<Vec<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        debug!(%url, "Fetching page");
        let response = ensure_success(self.request(Method::GET, url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Walk a paginated list endpoint, fetching the next page only when the
    /// consumer reaches it. A short page ends the listing.
    fn paginate<T>(&self, url: Url) -> BoxStream<'_, Result<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        stream::unfold(Some(1usize), move |page| {
            let url = url.clone();
            async move {
                let page = page?;
                let result = self.fetch_page::<T>(url, page).await;
                let next = match &result {
                    Ok(items) if items.len() == PER_PAGE => Some(page + 1),
                    _ => None,
                };
                Some((result, next))
            }
        })
        .flat_map(|result| {
            let items: Vec<Result<T>> = match result {
                Ok(items) => items.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        })
        .boxed()
    }
}

#[async_trait]
impl ReviewSystem for GithubClient {
    fn pull_requests(&self) -> PullRequestStream<'_> {
        match self.repo_url("pulls") {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("state", "open");
                self.paginate(url)
            }
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }

    async fn reviews(&self, pr: &PullRequest) -> Result<Vec<Review>> {
        let url = self.repo_url(&format!("pulls/{}/reviews", pr.number))?;
        let mut reviews = Vec::new();
        let mut pages = self.paginate::<Review>(url);
        while let Some(review) = pages.next().await {
            reviews.push(review?);
        }
        Ok(reviews)
    }

    async fn merge(&self, pr: &PullRequest, options: &MergeOptions) -> Result<()> {
        let url = self.repo_url(&format!("pulls/{}/merge", pr.number))?;
        let body = json!({
            "commit_title": options.commit_title,
            "commit_message": options.commit_message,
            "merge_method": options.merge_method.as_str(),
        });
        let merge_failed = |reason: String| OrchestratorError::Merge {
            number: pr.number,
            reason,
        };
        let response = self
            .request(Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| merge_failed(e.to_string()))?;
        ensure_success(response)
            .await
            .map_err(|e| merge_failed(e.to_string()))?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(OrchestratorError::ReviewSystem(format!(
        "GitHub returned {}: {}",
        status.as_u16(),
        error_message(&body)
    )))
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
