// Single issue retrieval: the issue first, then its comments if it has any
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    models::{Comment, Issue},
    repo_ref::RepoRef,
    source::IssueSource,
    Error, Result,
};

/// An issue together with whatever we managed to load of its thread
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetail {
    pub issue: Issue,
    pub comments: Vec<Comment>,
    /// Set when the comment fetch failed; the issue itself is still good
    pub comments_error: Option<String>,
}

impl IssueDetail {
    pub fn comments_failed(&self) -> bool {
        self.comments_error.is_some()
    }
}

/// Fetch an issue and, only once that succeeded, its comments
///
/// A failed issue fetch is returned as an error. A failed comment fetch is
/// logged and recorded on the detail instead.
pub async fn fetch_issue_detail<S>(source: &S, repo: &RepoRef, number: u64) -> Result<IssueDetail>
where
    S: IssueSource + ?Sized,
{
    if number == 0 {
        return Err(Error::ValidationError(
            "issue numbers start at 1".to_string(),
        ));
    }

    let issue = source.get_issue(repo, number).await?;

    if issue.comments == 0 {
        debug!("{}#{} has no comments, skipping thread fetch", repo, number);
        return Ok(IssueDetail {
            issue,
            comments: Vec::new(),
            comments_error: None,
        });
    }

    match source.list_comments(repo, number).await {
        Ok(comments) => Ok(IssueDetail {
            issue,
            comments,
            comments_error: None,
        }),
        Err(err) => {
            warn!("Failed to fetch comments for {}#{}: {}", repo, number, err);
            Ok(IssueDetail {
                issue,
                comments: Vec::new(),
                comments_error: Some(err.to_string()),
            })
        }
    }
}

/// Identity of a detail request, so late answers for another issue are ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub repo: RepoRef,
    pub number: u64,
    generation: u64,
}

/// Detail view state: what is loading, what loaded, what failed
#[derive(Debug, Default)]
pub struct IssueDetailState {
    in_flight: Option<DetailTicket>,
    generation: u64,
    detail: Option<IssueDetail>,
    error: Option<Error>,
}

impl IssueDetailState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading an issue, superseding anything still outstanding
    pub fn open(&mut self, repo: RepoRef, number: u64) -> DetailTicket {
        self.generation += 1;
        let ticket = DetailTicket {
            repo,
            number,
            generation: self.generation,
        };
        self.in_flight = Some(ticket.clone());
        self.detail = None;
        self.error = None;
        ticket
    }

    /// Apply a finished fetch; returns false when it was stale
    pub fn complete(&mut self, ticket: &DetailTicket, result: Result<IssueDetail>) -> bool {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!("Discarding stale detail for {}#{}", ticket.repo, ticket.number);
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(detail) => {
                self.detail = Some(detail);
                self.error = None;
            }
            Err(err) => {
                self.detail = None;
                self.error = Some(err);
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True while this very issue is being fetched
    pub fn is_loading_issue(&self, repo: &RepoRef, number: u64) -> bool {
        self.in_flight
            .as_ref()
            .map(|ticket| &ticket.repo == repo && ticket.number == number)
            .unwrap_or(false)
    }

    pub fn detail(&self) -> Option<&IssueDetail> {
        self.detail.as_ref()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}
