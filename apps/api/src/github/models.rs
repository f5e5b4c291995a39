use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Maximum repositories kept in a summary. The API is asked for 10.
pub const TOP_REPOSITORIES: usize = 5;

pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_BIO: &str = "No bio available";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_BLOG: &str = "No blog";
pub const NO_DESCRIPTION: &str = "No description";

// ────────────────────────────────────────────────────────────────────────────
// Wire payloads (GET /users/{username}, GET /users/{username}/repos)
// ────────────────────────────────────────────────────────────────────────────

/// Subset of the GitHub user object. Every field is optional on purpose:
/// GitHub sends `null` for unset profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub updated_at: Option<String>,
    pub topics: Option<Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Reduced summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: String,
    pub primary_language: String,
    pub star_count: u64,
    pub fork_count: u64,
    pub updated_at: String,
    pub topics: BTreeSet<String>,
}

/// A GitHub user's public profile with every optional field defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub display_name: String,
    pub bio: String,
    pub company: String,
    pub location: String,
    pub blog_url: String,
    pub public_repo_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    /// ISO-8601 timestamp, or empty when GitHub did not send one.
    pub created_at: String,
    /// At most `TOP_REPOSITORIES`, in the order the API returned them.
    pub top_repositories: Vec<RepoSummary>,
}

/// Outcome of one profile fetch. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Ok(ProfileSummary),
    Failed(String),
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchResult::Ok(_))
    }
}

/// Blank strings are treated the same as missing ones (GitHub sends `"blog": ""`).
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl From<RepoPayload> for RepoSummary {
    fn from(repo: RepoPayload) -> Self {
        RepoSummary {
            name: or_default(repo.name, NOT_PROVIDED),
            description: or_default(repo.description, NO_DESCRIPTION),
            primary_language: or_default(repo.language, NOT_SPECIFIED),
            star_count: repo.stargazers_count.unwrap_or(0),
            fork_count: repo.forks_count.unwrap_or(0),
            updated_at: repo.updated_at.unwrap_or_default(),
            topics: repo
                .topics
                .unwrap_or_default()
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
        }
    }
}

impl ProfileSummary {
    pub fn from_payloads(user: UserPayload, repos: Vec<RepoPayload>) -> Self {
        ProfileSummary {
            display_name: or_default(user.name, NOT_PROVIDED),
            bio: or_default(user.bio, NO_BIO),
            company: or_default(user.company, NOT_SPECIFIED),
            location: or_default(user.location, NOT_SPECIFIED),
            blog_url: or_default(user.blog, NO_BLOG),
            public_repo_count: user.public_repos.unwrap_or(0),
            follower_count: user.followers.unwrap_or(0),
            following_count: user.following.unwrap_or(0),
            created_at: user.created_at.unwrap_or_default(),
            top_repositories: repos
                .into_iter()
                .take(TOP_REPOSITORIES)
                .map(RepoSummary::from)
                .collect(),
        }
    }
}
