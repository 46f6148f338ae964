use issuescout_api::PageLinks;

use crate::{
    models::{Comment, Issue, Repository},
    repo_ref::RepoRef,
    Result,
};

/// One page straight from the source, before pagination bookkeeping
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    /// Issues only; pull requests are already dropped
    pub issues: Vec<Issue>,
    /// How many items the response held before pull requests were dropped
    pub raw_count: usize,
    pub links: PageLinks,
}

/// Trait for issue sources - the seam between the pipeline and the network
///
/// GitHub is the only real implementation. Tests swap in a mock so the
/// pipeline can be exercised without a server.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IssueSource: Send + Sync {
    async fn list_issues(&self, repo: &RepoRef, page: u32, per_page: u32) -> Result<SourcePage>;
    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository>;
    async fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue>;
    async fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<Comment>>;
}
