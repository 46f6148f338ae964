// GitHub provider implementation - bridges API client with IssueSource trait
use async_trait::async_trait;
use issuescout_api::{
    GitHubClient, GitHubComment, GitHubError, GitHubIssue, GitHubLabel, GitHubRepo, GitHubUser,
    IssueListParams,
};
use tracing::debug;

use crate::{
    models::{Comment, Issue, IssueState, Label, Repository, User},
    repo_ref::RepoRef,
    source::{IssueSource, SourcePage},
    Error, Result,
};

/// Wrapper around GitHubClient that implements IssueSource
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(token: Option<String>, api_url: &str) -> Result<Self> {
        let client = GitHubClient::with_base_url(token, api_url.to_string())
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }
}

#[async_trait]
impl IssueSource for GitHubProvider {
    async fn list_issues(&self, repo: &RepoRef, page: u32, per_page: u32) -> Result<SourcePage> {
        let fetched = self
            .client
            .list_issues(repo.owner(), repo.name(), IssueListParams { page, per_page })
            .await
            .map_err(|e| map_error(e, || format!("repository {} (it may be private)", repo)))?;

        let raw_count = fetched.items.len();
        let issues: Vec<Issue> = fetched
            .items
            .into_iter()
            .filter(|item| !item.is_pull_request())
            .map(github_to_issue)
            .collect();

        if issues.len() < raw_count {
            debug!(
                "Dropped {} pull requests from {} page {}",
                raw_count - issues.len(),
                repo,
                page
            );
        }

        Ok(SourcePage {
            issues,
            raw_count,
            links: fetched.links,
        })
    }

    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository> {
        let gh = self
            .client
            .get_repository(repo.owner(), repo.name())
            .await
            .map_err(|e| map_error(e, || format!("repository {} (it may be private)", repo)))?;

        Ok(github_to_repo(gh))
    }

    async fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue> {
        let gh = self
            .client
            .get_issue(repo.owner(), repo.name(), number)
            .await
            .map_err(|e| map_error(e, || format!("issue #{} in {}", number, repo)))?;

        Ok(github_to_issue(gh))
    }

    async fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<Comment>> {
        let comments = self
            .client
            .list_comments(repo.owner(), repo.name(), number)
            .await
            .map_err(|e| map_error(e, || format!("comments of #{} in {}", number, repo)))?;

        Ok(comments.into_iter().map(github_to_comment).collect())
    }
}

/// Fold client errors into the taxonomy the views deal with
fn map_error(err: GitHubError, what: impl FnOnce() -> String) -> Error {
    match err {
        GitHubError::NotFound(_) => Error::NotFound(what()),
        GitHubError::RequestFailed {
            status,
            status_text,
        } => Error::FetchError {
            status,
            status_text,
        },
        GitHubError::NetworkError(e) => Error::NetworkError(e.to_string()),
        GitHubError::ParseError(e) => Error::DecodeError(e.to_string()),
        GitHubError::ClientBuild(e) => Error::ConfigError(e),
    }
}

fn github_to_user(gh: GitHubUser) -> User {
    User {
        login: gh.login,
        avatar_url: gh.avatar_url,
    }
}

fn github_to_label(gh: GitHubLabel) -> Label {
    Label {
        id: gh.id,
        name: gh.name,
        color: gh.color,
    }
}

/// Convert GitHub API issue to our internal Issue model
fn github_to_issue(gh: GitHubIssue) -> Issue {
    let state = if gh.state == "closed" {
        IssueState::Closed
    } else {
        IssueState::Open
    };

    Issue {
        id: gh.id,
        number: gh.number,
        title: gh.title,
        body: gh.body,
        state,
        labels: gh.labels.into_iter().map(github_to_label).collect(),
        assignee: gh.assignee.map(github_to_user),
        assignees: gh.assignees.into_iter().map(github_to_user).collect(),
        author: gh.user.map(github_to_user).unwrap_or_else(User::ghost),
        created_at: gh.created_at,
        updated_at: gh.updated_at,
        closed_at: gh.closed_at,
        comments: gh.comments,
        html_url: gh.html_url,
    }
}

fn github_to_comment(gh: GitHubComment) -> Comment {
    Comment {
        id: gh.id,
        body: gh.body,
        author: gh.user.map(github_to_user).unwrap_or_else(User::ghost),
        created_at: gh.created_at,
        updated_at: gh.updated_at,
        html_url: gh.html_url,
    }
}

/// Convert GitHub API repo to our internal Repository model
fn github_to_repo(gh: GitHubRepo) -> Repository {
    Repository {
        full_name: gh.full_name,
        owner: gh.owner.login,
        description: gh.description,
        language: gh.language,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        open_issues: gh.open_issues_count,
        url: gh.html_url,
    }
}
