// Filtering, sorting and the option lists the filter widgets offer
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::{Issue, IssueState};

/// Which issue states to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StateFilter {
    pub fn matches(self, state: IssueState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Open => state == IssueState::Open,
            StateFilter::Closed => state == IssueState::Closed,
        }
    }

    /// All -> Open -> Closed -> All
    pub fn cycle(self) -> Self {
        match self {
            StateFilter::All => StateFilter::Open,
            StateFilter::Open => StateFilter::Closed,
            StateFilter::Closed => StateFilter::All,
        }
    }
}

impl std::fmt::Display for StateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateFilter::All => write!(f, "all"),
            StateFilter::Open => write!(f, "open"),
            StateFilter::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for StateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StateFilter::All),
            "open" => Ok(StateFilter::Open),
            "closed" => Ok(StateFilter::Closed),
            other => Err(format!("unknown state {:?} (expected all, open or closed)", other)),
        }
    }
}

/// Everything the user can narrow the issue list by
///
/// Dimensions combine with AND. Inside a dimension the rules differ: labels
/// are OR over the selection, assignee and keyword are substring matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub state: StateFilter,
    pub labels: BTreeSet<String>,
    pub assignee: String,
    pub keyword: String,
}

impl FilterState {
    pub fn has_active_filters(&self) -> bool {
        self.state != StateFilter::All
            || !self.labels.is_empty()
            || !self.assignee.is_empty()
            || !self.keyword.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select the label if it isn't selected, deselect it otherwise
    pub fn toggle_label(&mut self, label: &str) {
        if !self.labels.remove(label) {
            self.labels.insert(label.to_string());
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        self.matches_state(issue)
            && self.matches_labels(issue)
            && self.matches_assignee(issue)
            && self.matches_keyword(issue)
    }

    fn matches_state(&self, issue: &Issue) -> bool {
        self.state.matches(issue.state)
    }

    fn matches_labels(&self, issue: &Issue) -> bool {
        self.labels.is_empty() || self.labels.iter().any(|label| issue.has_label(label))
    }

    fn matches_assignee(&self, issue: &Issue) -> bool {
        if self.assignee.is_empty() {
            return true;
        }
        let wanted = self.assignee.to_lowercase();
        issue
            .assignee_login()
            .map(|login| login.to_lowercase().contains(&wanted))
            .unwrap_or(false)
    }

    fn matches_keyword(&self, issue: &Issue) -> bool {
        if self.keyword.is_empty() {
            return true;
        }
        let keyword = self.keyword.to_lowercase();
        issue.title.to_lowercase().contains(&keyword)
            || issue.author.login.to_lowercase().contains(&keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Created,
    Comments,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::Created => write!(f, "created"),
            SortField::Comments => write!(f, "comments"),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SortField::Created),
            "comments" => Ok(SortField::Comments),
            other => Err(format!("unknown sort field {:?} (expected created or comments)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown direction {:?} (expected asc or desc)", other)),
        }
    }
}

/// Newest first unless told otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Picking the active field flips its direction, picking another field
    /// starts it descending
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    fn compare(&self, a: &Issue, b: &Issue) -> Ordering {
        let ordering = match self.field {
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Comments => a.comments.cmp(&b.comments),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// The list the user actually sees
///
/// Borrows from `issues` and never reorders it. `sort_by` is stable, so
/// issues that compare equal keep the order they were loaded in.
pub fn derive_view<'a>(issues: &'a [Issue], filters: &FilterState, sort: &SortState) -> Vec<&'a Issue> {
    let mut view: Vec<&Issue> = issues.iter().filter(|issue| filters.matches(issue)).collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

/// Every label name on the loaded issues, ascending
pub fn available_labels(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .flat_map(|issue| issue.labels.iter().map(|label| label.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every assignee login on the loaded issues, ascending
pub fn available_assignees(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .filter_map(|issue| issue.assignee_login().map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Narrow a label list for the label picker's search box
pub fn search_labels<'a>(labels: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    labels
        .iter()
        .filter(|label| label.to_lowercase().contains(&query))
        .map(String::as_str)
        .collect()
}

/// How welcoming the loaded issues look to newcomers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BeginnerCounts {
    pub good_first_issues: usize,
    pub help_wanted: usize,
}

pub fn beginner_counts(issues: &[Issue]) -> BeginnerCounts {
    let has_label_like = |issue: &Issue, needle: &str| {
        issue
            .labels
            .iter()
            .any(|label| label.name.to_lowercase().contains(needle))
    };

    BeginnerCounts {
        good_first_issues: issues
            .iter()
            .filter(|issue| has_label_like(issue, "good first issue"))
            .count(),
        help_wanted: issues
            .iter()
            .filter(|issue| has_label_like(issue, "help wanted"))
            .count(),
    }
}
