// Provider implementations - GitHub is the only one we need
pub mod github;

pub use github::GitHubProvider;
