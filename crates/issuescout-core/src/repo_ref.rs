// Repository identifiers and the routes built on top of them
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A validated `owner/name` pair
///
/// Construction is the only place repository strings get checked, so anything
/// holding a `RepoRef` can go straight to the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        validate_segment(owner, "owner")?;
        validate_segment(name, "repository name")?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse `owner/name`, ignoring surrounding whitespace
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let mut parts = input.split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => Self::new(owner, name),
            _ => Err(Error::ValidationError(format!(
                "expected owner/name, got {:?}",
                input
            ))),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_segment(segment: &str, what: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::ValidationError(format!("{} must not be empty", what)));
    }

    if segment == "." || segment == ".." {
        return Err(Error::ValidationError(format!(
            "{} {:?} is not allowed",
            what, segment
        )));
    }

    if let Some(bad) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(Error::ValidationError(format!(
            "{} {:?} contains invalid character {:?}",
            what, segment, bad
        )));
    }

    Ok(())
}

/// Where the user wants to go: the three screens of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Featured repository listing
    Directory,
    /// Issue list of one repository
    Repository(RepoRef),
    /// A single issue with its comments
    Issue(RepoRef, u64),
}

impl Route {
    /// Accepts ``, `owner/repo`, `owner/repo/issues/N` and `owner/repo#N`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().trim_matches('/');

        if input.is_empty() {
            return Ok(Route::Directory);
        }

        if let Some((repo, number)) = input.split_once('#') {
            return Ok(Route::Issue(RepoRef::parse(repo)?, parse_issue_number(number)?));
        }

        let parts: Vec<&str> = input.split('/').collect();
        match parts.as_slice() {
            [owner, name] => Ok(Route::Repository(RepoRef::new(owner, name)?)),
            [owner, name, "issues", number] => Ok(Route::Issue(
                RepoRef::new(owner, name)?,
                parse_issue_number(number)?,
            )),
            _ => Err(Error::ValidationError(format!(
                "expected owner/repo or owner/repo/issues/N, got {:?}",
                input
            ))),
        }
    }

    /// Path form, mirroring the GitHub web layout
    pub fn path(&self) -> String {
        match self {
            Route::Directory => String::new(),
            Route::Repository(repo) => repo.full_name(),
            Route::Issue(repo, number) => format!("{}/issues/{}", repo, number),
        }
    }
}

pub fn parse_issue_number(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::ValidationError(format!(
            "issue number must be a positive integer, got {:?}",
            input
        ))),
    }
}
