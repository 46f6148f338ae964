// The issue query pipeline - fetch a page, keep pagination straight, and
// remember which request is the one that counts
use issuescout_api::PageLinks;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    models::Issue,
    repo_ref::RepoRef,
    source::IssueSource,
    view::{available_assignees, available_labels},
    Error, Result,
};

/// GitHub refuses anything bigger
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Where a loaded page sits in the whole result set
///
/// Totals come from the `Link` header and nowhere else. The repository's
/// open issue count would be wrong twice over: it counts pull requests and
/// skips closed issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    /// `None` when GitHub says there is more but won't say how much
    pub total_pages: Option<u32>,
    pub has_more: bool,
}

impl Pagination {
    pub fn from_links(page: u32, per_page: u32, links: &PageLinks) -> Self {
        let has_more = links.has_next();
        let total_pages = match links.last {
            Some(last) => Some(last.max(page)),
            // No way forward means we're on the last page
            None if !has_more => Some(page),
            None => None,
        };

        Self {
            page,
            per_page,
            total_pages,
            has_more,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// A successfully loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub issues: Vec<Issue>,
    pub pagination: Pagination,
}

pub fn validate_page_request(page: u32, per_page: u32) -> Result<()> {
    if page == 0 {
        return Err(Error::ValidationError("page numbers start at 1".to_string()));
    }
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(Error::ValidationError(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PER_PAGE, per_page
        )));
    }
    Ok(())
}

/// Fetch one page of issues for an `owner/name` string
///
/// Malformed input is rejected before the source is touched.
pub async fn fetch_page<S>(source: &S, repo: &str, page: u32, per_page: u32) -> Result<PageResult>
where
    S: IssueSource + ?Sized,
{
    let repo = RepoRef::parse(repo)?;
    fetch_page_for(source, &repo, page, per_page).await
}

/// Fetch one page of issues for an already validated repository
pub async fn fetch_page_for<S>(
    source: &S,
    repo: &RepoRef,
    page: u32,
    per_page: u32,
) -> Result<PageResult>
where
    S: IssueSource + ?Sized,
{
    validate_page_request(page, per_page)?;

    debug!("Fetching {} page {} ({} per page)", repo, page, per_page);
    let fetched = source.list_issues(repo, page, per_page).await?;

    // An empty first page is just an empty repository. An empty later page
    // means we walked off the end.
    if fetched.raw_count == 0 && page > 1 {
        return Err(Error::OutOfBounds { page, per_page });
    }

    Ok(PageResult {
        issues: fetched.issues,
        pagination: Pagination::from_links(page, per_page, &fetched.links),
    })
}

/// What the view asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub repo: RepoRef,
    pub page: u32,
    pub per_page: u32,
    /// Add the page to what is loaded instead of replacing it
    pub append: bool,
}

/// Identity of an issued request
///
/// Only a completion carrying the latest ticket gets applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: PageRequest,
}

impl Ticket {
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completion handed to [`IssueQuery::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request superseded this one; nothing changed
    Stale,
}

/// Query state for one issue list view
///
/// Holds the loaded pages, the pagination cursor, the in-flight request and
/// the option sets derived from the loaded issues. All mutation goes through
/// the methods below, which hand out [`Ticket`]s for the caller to run.
///
/// Loaded issues are usually one page. [`IssueQuery::load_more`] appends the
/// following pages, and filters and option sets then cover all of them.
#[derive(Debug)]
pub struct IssueQuery {
    repo: Option<RepoRef>,
    /// Effective page: the page being requested, or the one loaded
    page: u32,
    /// Last page that loaded or failed hard; paging moves from here
    settled: u32,
    /// First page of the loaded run, below `settled` after a load_more
    first_page: u32,
    per_page: u32,
    issues: Vec<Issue>,
    pagination: Option<Pagination>,
    in_flight: Option<Ticket>,
    generation: u64,
    last_error: Option<Error>,
    labels: Vec<String>,
    assignees: Vec<String>,
}

impl IssueQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            repo: None,
            page: 1,
            settled: 1,
            first_page: 1,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            issues: Vec::new(),
            pagination: None,
            in_flight: None,
            generation: 0,
            last_error: None,
            labels: Vec::new(),
            assignees: Vec::new(),
        }
    }

    pub fn repo(&self) -> Option<&RepoRef> {
        self.repo.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A load_more is outstanding; the loaded pages stay usable meanwhile
    pub fn is_loading_more(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|ticket| ticket.request.append)
            .unwrap_or(false)
    }

    /// First and last page currently loaded
    pub fn loaded_pages(&self) -> Option<(u32, u32)> {
        self.pagination.map(|p| (self.first_page, p.page))
    }

    pub fn in_flight(&self) -> Option<&Ticket> {
        self.in_flight.as_ref()
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// A hard error that left nothing to show
    pub fn blocking_error(&self) -> Option<&Error> {
        self.last_error
            .as_ref()
            .filter(|err| err.is_hard() && self.issues.is_empty())
    }

    pub fn available_labels(&self) -> &[String] {
        &self.labels
    }

    pub fn available_assignees(&self) -> &[String] {
        &self.assignees
    }

    /// True once a page 1 came back with nothing on it
    pub fn is_empty_repository(&self) -> bool {
        self.issues.is_empty()
            && self.last_error.is_none()
            && self.pagination.map(|p| p.page == 1).unwrap_or(false)
    }

    /// Switch to another repository and start loading its first page
    ///
    /// Bad input is a soft error: whatever was on screen stays there.
    pub fn set_repo(&mut self, input: &str) -> Result<Ticket> {
        let repo = RepoRef::parse(input).map_err(|err| self.remember_rejection(err))?;

        info!("Switching issue query to {}", repo);
        self.repo = Some(repo.clone());
        self.reset_to_first_page();
        self.replace_issues(Vec::new());
        self.pagination = None;
        self.last_error = None;
        Ok(self.issue_ticket(repo))
    }

    /// Change the page size, which always starts over from page 1
    ///
    /// Returns `None` when no repository is selected yet.
    pub fn set_per_page(&mut self, per_page: u32) -> Result<Option<Ticket>> {
        validate_page_request(1, per_page).map_err(|err| self.remember_rejection(err))?;

        self.per_page = per_page;
        self.reset_to_first_page();

        match self.repo.clone() {
            Some(repo) => Ok(Some(self.issue_ticket(repo))),
            None => Ok(None),
        }
    }

    /// Ask for a specific page of the current repository
    ///
    /// Returns `None` when there is nothing to do: no repository yet, or a
    /// request is already outstanding (duplicate submissions are dropped).
    pub fn request_page(&mut self, page: u32) -> Result<Option<Ticket>> {
        self.request(page, false)
    }

    /// Jump straight to a page the user typed in
    pub fn goto_page(&mut self, page: u32) -> Result<Option<Ticket>> {
        self.request_page(page)
    }

    pub fn next_page(&mut self) -> Result<Option<Ticket>> {
        match self.pagination {
            Some(p) if !p.has_more => Ok(None),
            _ => self.request_page(self.settled + 1),
        }
    }

    pub fn prev_page(&mut self) -> Result<Option<Ticket>> {
        let current = self.first_page.min(self.settled);
        if current <= 1 {
            return Ok(None);
        }
        self.request_page(current - 1)
    }

    /// Append the page after the last loaded one
    ///
    /// Returns `None` when nothing is loaded yet, the last page is already
    /// in, or a request is outstanding.
    pub fn load_more(&mut self) -> Result<Option<Ticket>> {
        match self.pagination {
            Some(p) if p.has_more => self.request(p.page + 1, true),
            _ => Ok(None),
        }
    }

    /// Retry whatever page is current, loaded or failed
    ///
    /// After a load_more the whole run starts over from its first page.
    pub fn refresh(&mut self) -> Result<Option<Ticket>> {
        let page = if self.pagination.is_some() {
            self.first_page
        } else {
            self.settled
        };
        self.request_page(page)
    }

    /// Apply the outcome of a request
    ///
    /// Completions for anything but the latest ticket are dropped untouched.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<PageResult>) -> Completion {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                "Discarding stale response for {} page {} (generation {})",
                ticket.request.repo, ticket.request.page, ticket.generation
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(loaded) => {
                info!(
                    "Loaded {} issues for {} page {}",
                    loaded.issues.len(),
                    ticket.request.repo,
                    loaded.pagination.page
                );
                let page = loaded.pagination.page;
                if ticket.request.append {
                    let mut issues = std::mem::take(&mut self.issues);
                    // Issues opened meanwhile shift earlier ones onto the next page
                    for issue in loaded.issues {
                        if !issues.iter().any(|known| known.id == issue.id) {
                            issues.push(issue);
                        }
                    }
                    self.replace_issues(issues);
                } else {
                    self.first_page = page;
                    self.replace_issues(loaded.issues);
                }
                self.page = page;
                self.settled = page;
                self.pagination = Some(loaded.pagination);
                self.last_error = None;
            }
            Err(err) if ticket.request.append => {
                // Pages already loaded stay, whatever went wrong
                warn!("Loading more of {} failed: {}", ticket.request.repo, err);
                self.page = self.settled;
                self.last_error = Some(err);
            }
            Err(err) if err.is_hard() => {
                warn!("Loading {} failed: {}", ticket.request.repo, err);
                self.replace_issues(Vec::new());
                self.pagination = None;
                self.page = ticket.request.page;
                self.settled = ticket.request.page;
                self.first_page = ticket.request.page;
                self.last_error = Some(err);
            }
            Err(err) => {
                warn!("Keeping current page of {}: {}", ticket.request.repo, err);
                self.page = self.settled;
                self.last_error = Some(err);
            }
        }

        Completion::Applied
    }

    /// Run a ticket against a source and apply the result
    pub async fn run<S>(&mut self, source: &S, ticket: Ticket) -> Completion
    where
        S: IssueSource + ?Sized,
    {
        let request = ticket.request();
        let result = fetch_page_for(source, &request.repo, request.page, request.per_page).await;
        self.complete(&ticket, result)
    }

    fn request(&mut self, page: u32, append: bool) -> Result<Option<Ticket>> {
        let Some(repo) = self.repo.clone() else {
            return Ok(None);
        };

        if let Some(ticket) = &self.in_flight {
            debug!(
                "Ignoring request for page {} while page {} is loading",
                page, ticket.request.page
            );
            return Ok(None);
        }

        validate_page_request(page, self.per_page).map_err(|err| self.remember_rejection(err))?;

        self.page = page;
        Ok(Some(self.ticket_for(repo, append)))
    }

    fn reset_to_first_page(&mut self) {
        self.page = 1;
        self.settled = 1;
        self.first_page = 1;
    }

    fn issue_ticket(&mut self, repo: RepoRef) -> Ticket {
        self.ticket_for(repo, false)
    }

    fn ticket_for(&mut self, repo: RepoRef, append: bool) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            request: PageRequest {
                repo,
                page: self.page,
                per_page: self.per_page,
                append,
            },
        };
        if let Some(previous) = self.in_flight.replace(ticket.clone()) {
            debug!("Request generation {} superseded", previous.generation);
        }
        ticket
    }

    /// Input was rejected locally; show why but keep everything else
    fn remember_rejection(&mut self, err: Error) -> Error {
        if let Error::ValidationError(message) = &err {
            self.last_error = Some(Error::ValidationError(message.clone()));
        }
        err
    }

    /// Loaded issues only change here, and the option sets follow
    fn replace_issues(&mut self, issues: Vec<Issue>) {
        self.labels = available_labels(&issues);
        self.assignees = available_assignees(&issues);
        self.issues = issues;
    }
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}
