use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Profile, RepositorySummary, SearchResponse, SearchUser};

/// Page size for the repository list.
pub const REPOS_PER_PAGE: usize = 6;
/// Maximum number of suggestion candidates.
pub const SUGGESTIONS_PER_PAGE: usize = 5;

/// The read-only slice of the GitHub REST API the finder consumes.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetches a GitHub user by username.
    async fn fetch_user(&self, username: &str) -> Result<Profile, ApiError>;

    /// Fetches the user's most recently updated repositories.
    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepositorySummary>, ApiError>;

    /// Searches GitHub users matching a partial login.
    async fn search_users(&self, query: &str) -> Result<Vec<SearchUser>, ApiError>;
}

/// Creates a preconfigured HTTP client with required headers.
pub fn build_client(user_agent: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).context("Invalid user agent value")?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );

    Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// reqwest-backed [`GitHubApi`]. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
}

impl GitHubClient {
    pub fn new(http: Client, api_base: Url) -> Self {
        Self { http, api_base }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_client(&config.user_agent)?;
        Ok(Self::new(http, config.api_base.clone()))
    }

    /// The shared reqwest client, also used for avatar downloads.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn user_url(&self, username: &str) -> Url {
        endpoint(&self.api_base, &["users", username], &[])
    }

    pub fn repos_url(&self, username: &str) -> Url {
        let per_page = REPOS_PER_PAGE.to_string();
        endpoint(
            &self.api_base,
            &["users", username, "repos"],
            &[("sort", "updated"), ("per_page", &per_page)],
        )
    }

    pub fn search_url(&self, query: &str) -> Url {
        let per_page = SUGGESTIONS_PER_PAGE.to_string();
        endpoint(
            &self.api_base,
            &["search", "users"],
            &[("q", query), ("per_page", &per_page)],
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "GitHub API returned an error status");
            return Err(ApiError::from_status(status));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Decode(e.to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_user(&self, username: &str) -> Result<Profile, ApiError> {
        self.get_json(self.user_url(username)).await
    }

    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepositorySummary>, ApiError> {
        let mut repos: Vec<RepositorySummary> = self.get_json(self.repos_url(username)).await?;
        repos.truncate(REPOS_PER_PAGE);
        Ok(repos)
    }

    async fn search_users(&self, query: &str) -> Result<Vec<SearchUser>, ApiError> {
        let search: SearchResponse = self.get_json(self.search_url(query)).await?;
        let mut users = search.items;
        users.truncate(SUGGESTIONS_PER_PAGE);
        Ok(users)
    }
}

/// Appends percent-encoded path segments and query pairs to the API base.
fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}
