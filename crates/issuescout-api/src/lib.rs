// GitHub REST client - the only platform we talk to
pub mod github;
pub mod links;

// Re-export common types
pub use github::{
    GitHubClient, GitHubComment, GitHubError, GitHubIssue, GitHubLabel, GitHubRepo, GitHubUser,
    IssueListParams, IssuesPage,
};
pub use links::PageLinks;
