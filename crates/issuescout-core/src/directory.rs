// Featured repositories for the landing screen
use std::collections::BTreeSet;

use crate::{repo_ref::RepoRef, Result};

/// A hand-picked project that welcomes contributors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedRepo {
    pub owner: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub tags: &'static [&'static str],
}

impl FeaturedRepo {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn repo_ref(&self) -> Result<RepoRef> {
        RepoRef::new(self.owner, self.name)
    }
}

const FEATURED: &[FeaturedRepo] = &[
    FeaturedRepo {
        owner: "facebook",
        name: "react",
        description: "The library for web and native user interfaces",
        language: "JavaScript",
        tags: &["Frontend", "Library", "Popular"],
    },
    FeaturedRepo {
        owner: "vercel",
        name: "next.js",
        description: "The React Framework for the Web",
        language: "TypeScript",
        tags: &["Framework", "Full-stack", "Popular"],
    },
    FeaturedRepo {
        owner: "tensorflow",
        name: "tensorflow",
        description: "An Open Source Machine Learning Framework for Everyone",
        language: "Python",
        tags: &["ML", "AI", "Python"],
    },
    FeaturedRepo {
        owner: "vuejs",
        name: "core",
        description: "The Progressive JavaScript Framework",
        language: "TypeScript",
        tags: &["Frontend", "Framework", "Beginner-friendly"],
    },
    FeaturedRepo {
        owner: "kubernetes",
        name: "kubernetes",
        description: "Production-Grade Container Scheduling and Management",
        language: "Go",
        tags: &["DevOps", "Infrastructure", "Cloud"],
    },
    FeaturedRepo {
        owner: "microsoft",
        name: "vscode",
        description: "Visual Studio Code",
        language: "TypeScript",
        tags: &["Editor", "Tools", "Popular"],
    },
    FeaturedRepo {
        owner: "nodejs",
        name: "node",
        description: "Node.js JavaScript runtime",
        language: "JavaScript",
        tags: &["Runtime", "Backend"],
    },
    FeaturedRepo {
        owner: "rust-lang",
        name: "rust",
        description: "Empowering everyone to build reliable and efficient software",
        language: "Rust",
        tags: &["Language", "Compiler", "Beginner-friendly"],
    },
];

pub fn featured() -> &'static [FeaturedRepo] {
    FEATURED
}

/// Case-insensitive match on name, description or owner, optionally
/// restricted to one language. An empty query matches everything.
pub fn search<'a>(
    entries: &'a [FeaturedRepo],
    query: &str,
    language: Option<&str>,
) -> Vec<&'a FeaturedRepo> {
    let query = query.trim().to_lowercase();

    entries
        .iter()
        .filter(|repo| {
            query.is_empty()
                || repo.name.to_lowercase().contains(&query)
                || repo.description.to_lowercase().contains(&query)
                || repo.owner.to_lowercase().contains(&query)
        })
        .filter(|repo| language.map(|lang| repo.language == lang).unwrap_or(true))
        .collect()
}

/// Distinct languages across the entries, sorted
pub fn languages(entries: &[FeaturedRepo]) -> Vec<&'static str> {
    entries
        .iter()
        .map(|repo| repo.language)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_featured_entry_is_a_valid_repo() {
        for repo in featured() {
            assert!(repo.repo_ref().is_ok(), "{} is not valid", repo.full_name());
        }
    }

    #[test]
    fn test_search_matches_name_description_or_owner() {
        let names = |hits: Vec<&FeaturedRepo>| hits.iter().map(|r| r.name).collect::<Vec<_>>();

        assert_eq!(names(search(featured(), "REACT", None)), vec!["react", "next.js"]);
        assert_eq!(names(search(featured(), "microsoft", None)), vec!["vscode"]);
        assert_eq!(names(search(featured(), "container", None)), vec!["kubernetes"]);
        assert_eq!(search(featured(), "", None).len(), featured().len());
        assert!(search(featured(), "cobol", None).is_empty());
    }

    #[test]
    fn test_language_filter() {
        let hits = search(featured(), "", Some("TypeScript"));
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|r| r.language == "TypeScript"));

        assert!(search(featured(), "react", Some("Go")).is_empty());
    }

    #[test]
    fn test_languages_are_distinct_and_sorted() {
        assert_eq!(
            languages(featured()),
            vec!["Go", "JavaScript", "Python", "Rust", "TypeScript"]
        );
    }
}
