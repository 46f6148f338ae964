use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::links::PageLinks;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("IssueScout/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {status_text}")]
    RequestFailed { status: u16, status_text: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Query parameters for the issue listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueListParams {
    pub page: u32,
    pub per_page: u32,
}

/// One page of the issue listing plus whatever the `Link` header told us
#[derive(Debug, Clone)]
pub struct IssuesPage {
    pub items: Vec<GitHubIssue>,
    pub links: PageLinks,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise, or a local mock server in tests
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GitHubError::ClientBuild(e.to_string()))?;

        // An empty token means "not configured", same as a missing one
        let token = token.filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Get repository metadata
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<GitHubRepo> {
        let path = repo_path(owner, repo);
        let response = self.get(&path, &[]).await?;
        decode(response).await
    }

    /// List one page of issues, newest first
    ///
    /// The endpoint mixes pull requests in with issues; callers that only want
    /// issues should check [`GitHubIssue::is_pull_request`].
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        params: IssueListParams,
    ) -> Result<IssuesPage> {
        let path = format!("{}/issues", repo_path(owner, repo));
        let query = [
            ("state", "all".to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", params.per_page.to_string()),
            ("page", params.page.to_string()),
        ];

        let response = self.get(&path, &query).await?;

        let links = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(PageLinks::parse)
            .unwrap_or_default();

        let items: Vec<GitHubIssue> = decode(response).await?;
        debug!(
            "Fetched {} items for {}/{} page {} (links: {:?})",
            items.len(),
            owner,
            repo,
            params.page,
            links
        );

        Ok(IssuesPage { items, links })
    }

    /// Get a single issue by number
    pub async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<GitHubIssue> {
        let path = format!("{}/issues/{}", repo_path(owner, repo), number);
        let response = self.get(&path, &[]).await?;
        decode(response).await
    }

    /// List the discussion thread of an issue
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<GitHubComment>> {
        let path = format!("{}/issues/{}/comments", repo_path(owner, repo), number);
        let query = [("per_page", "100".to_string())];
        let response = self.get(&path, &query).await?;
        decode(response).await
    }

    /// Send a GET and turn non-2xx statuses into errors
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url).query(query);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
            let body = response.text().await.unwrap_or_default();
            debug!("GET {} failed with {}: {}", url, status, body);

            return Err(GitHubError::RequestFailed {
                status: status.as_u16(),
                status_text,
            });
        }

        Ok(response)
    }
}

/// `/repos/{owner}/{repo}` with both segments escaped
fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub html_url: String,
    pub owner: GitHubUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    pub id: u64,
    pub name: String,
    /// Hex without the leading `#`
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub assignee: Option<GitHubUser>,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    /// `None` for deleted accounts
    pub user: Option<GitHubUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: u32,
    pub html_url: String,
    /// Present only when the "issue" is actually a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub user: Option<GitHubUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
}
