//! GitHub profile fetcher: two unauthenticated REST reads reduced to a `ProfileSummary`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{FetchResult, ProfileSummary, RepoPayload, UserPayload};

const REPOS_PER_PAGE: u32 = 10;

/// Source of candidate profile data. Carried by the orchestrator as `Arc<dyn ProfileFetcher>`.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self, profile_url: &str) -> FetchResult;
}

/// Takes the last non-empty path segment. No other validation: a malformed URL
/// yields a wrong or empty username and the API answers 404.
pub fn username_from_url(profile_url: &str) -> &str {
    profile_url
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or("")
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// `timeout` bounds each of the two requests separately.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("interview-api/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<(StatusCode, String), reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

fn parse<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, String> {
    serde_json::from_str(body).map_err(|e| format!("Failed to parse GitHub {what} response: {e}"))
}

#[async_trait]
impl ProfileFetcher for GitHubClient {
    async fn fetch(&self, profile_url: &str) -> FetchResult {
        let username = username_from_url(profile_url);
        let user_url = format!("{}/users/{}", self.base_url, username);
        let repos_url = format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            self.base_url, username, REPOS_PER_PAGE
        );

        debug!("Fetching GitHub profile for '{username}'");

        let (user_status, user_body) = match self.get(&user_url).await {
            Ok(r) => r,
            Err(e) => return FetchResult::Failed(format!("Failed to reach GitHub: {e}")),
        };
        let (repos_status, repos_body) = match self.get(&repos_url).await {
            Ok(r) => r,
            Err(e) => return FetchResult::Failed(format!("Failed to reach GitHub: {e}")),
        };

        if user_status != StatusCode::OK || repos_status != StatusCode::OK {
            let reason = format!(
                "GitHub API returned status {} for user, {} for repos",
                user_status.as_u16(),
                repos_status.as_u16()
            );
            warn!("{reason} ({username})");
            return FetchResult::Failed(reason);
        }

        let user: UserPayload = match parse("user", &user_body) {
            Ok(u) => u,
            Err(reason) => return FetchResult::Failed(reason),
        };
        let repos: Vec<RepoPayload> = match parse("repos", &repos_body) {
            Ok(r) => r,
            Err(reason) => return FetchResult::Failed(reason),
        };

        FetchResult::Ok(ProfileSummary::from_payloads(user, repos))
    }
}
