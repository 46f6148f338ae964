// Core business logic lives here - the issue query pipeline and friends
pub mod config;
pub mod contrast;
pub mod detail;
pub mod directory;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod repo_ref;
pub mod source;
pub mod view;

pub use config::Config;
pub use contrast::{label_text_color, TextColor};
pub use detail::{fetch_issue_detail, IssueDetail, IssueDetailState};
pub use error::Error;
pub use issuescout_api::PageLinks;
pub use pipeline::{fetch_page, fetch_page_for, IssueQuery, PageResult, Pagination, Ticket};
pub use providers::GitHubProvider;
pub use repo_ref::{RepoRef, Route};
pub use source::{IssueSource, SourcePage};
pub use view::{derive_view, FilterState, SortDirection, SortField, SortState, StateFilter};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
