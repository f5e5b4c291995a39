//! Renders a fetched profile into the text block the candidate stage reads.
//!
//! Pure and deterministic: the same `(url, result)` always renders the same bytes.

use super::models::{FetchResult, ProfileSummary, RepoSummary};

/// Renders `result` for prompt inclusion. A failed fetch becomes a one-line fallback;
/// the failure reason is the caller's to log.
pub fn format_profile(profile_url: &str, result: &FetchResult) -> String {
    match result {
        FetchResult::Ok(summary) => format_summary(profile_url, summary),
        FetchResult::Failed(_) => fallback_line(profile_url),
    }
}

pub fn fallback_line(profile_url: &str) -> String {
    format!("GitHub Profile: {profile_url} (live GitHub data could not be fetched)")
}

fn format_summary(profile_url: &str, summary: &ProfileSummary) -> String {
    let created_at = if summary.created_at.is_empty() {
        "Unknown"
    } else {
        summary.created_at.as_str()
    };

    let mut out = format!(
        "GitHub Profile Analysis for {profile_url}:\n\
        \n\
        Personal Info:\n\
        - Name: {}\n\
        - Bio: {}\n\
        - Company: {}\n\
        - Location: {}\n\
        - Blog: {}\n\
        - Public Repositories: {}\n\
        - Followers: {}\n\
        - Following: {}\n\
        - Account Created: {}\n\
        \n\
        Top {} Recent Repositories:\n",
        summary.display_name,
        summary.bio,
        summary.company,
        summary.location,
        summary.blog_url,
        summary.public_repo_count,
        summary.follower_count,
        summary.following_count,
        created_at,
        summary.top_repositories.len(),
    );

    if summary.top_repositories.is_empty() {
        out.push_str("No public repositories.\n");
    }
    for (index, repo) in summary.top_repositories.iter().enumerate() {
        out.push_str(&format_repo(index + 1, repo));
    }

    out
}

fn format_repo(position: usize, repo: &RepoSummary) -> String {
    let topics = if repo.topics.is_empty() {
        "None".to_string()
    } else {
        repo.topics.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    format!(
        "{position}. {}\n   \
        - Language: {}\n   \
        - Description: {}\n   \
        - Stars: {} | Forks: {}\n   \
        - Topics: {topics}\n   \
        - Last Updated: {}\n",
        repo.name,
        repo.primary_language,
        repo.description,
        repo.star_count,
        repo.fork_count,
        repo.updated_at,
    )
}
