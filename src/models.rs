use serde::Deserialize;

/// A GitHub user profile from the `/users/{username}` API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_gists: u64,
    pub html_url: String,
    pub avatar_url: String,
}

/// One entry of `/users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
}

/// Response from the GitHub Search Users API (`/search/users`).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchUser>,
}

/// A single user item from the search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchUser {
    pub login: String,
    pub avatar_url: String,
}

/// Candidates returned for one partial query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionList {
    /// The trimmed input the request was issued for.
    pub query: String,
    pub users: Vec<SearchUser>,
}
