// GitHub enrichment for the candidate stage.
// Fetch failures never propagate: they degrade to a fallback text block.

pub mod client;
pub mod formatter;
pub mod models;

pub use client::{GitHubClient, ProfileFetcher};
pub use formatter::format_profile;
pub use models::{FetchResult, ProfileSummary, RepoSummary};
