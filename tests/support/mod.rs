//! In-memory GitHub API double shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use github_finder::models::{Profile, RepositorySummary, SearchUser};
use github_finder::share::{Clipboard, Sharer};
use github_finder::{ApiError, Finder, GitHubApi, Location};
use reqwest::Url;
use tokio::runtime::Handle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    User(String),
    Repos(String),
    Search(String),
}

#[derive(Default)]
pub struct FakeApi {
    users: Mutex<HashMap<String, Result<Profile, ApiError>>>,
    repos: Mutex<HashMap<String, Result<Vec<RepositorySummary>, ApiError>>>,
    search: Mutex<HashMap<String, Result<Vec<SearchUser>, ApiError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn with_user(self, login: &str, repos: Vec<RepositorySummary>) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(login.to_owned(), Ok(profile(login)));
        self.repos.lock().unwrap().insert(login.to_owned(), Ok(repos));
        self
    }

    pub fn with_user_error(self, login: &str, error: ApiError) -> Self {
        self.users.lock().unwrap().insert(login.to_owned(), Err(error));
        self
    }

    pub fn with_repos_error(self, login: &str, error: ApiError) -> Self {
        self.repos.lock().unwrap().insert(login.to_owned(), Err(error));
        self
    }

    pub fn with_search(self, query: &str, logins: &[&str]) -> Self {
        let users = logins.iter().map(|login| search_user(login)).collect();
        self.search.lock().unwrap().insert(query.to_owned(), Ok(users));
        self
    }

    pub fn with_search_error(self, query: &str, error: ApiError) -> Self {
        self.search.lock().unwrap().insert(query.to_owned(), Err(error));
        self
    }

    /// Delays every response for `key` (a login or search query).
    pub fn with_delay(self, key: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(key.to_owned(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Search(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn user_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::User(login) => Some(login),
                _ => None,
            })
            .collect()
    }

    async fn delay(&self, key: &str) {
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl GitHubApi for FakeApi {
    async fn fetch_user(&self, username: &str) -> Result<Profile, ApiError> {
        self.calls.lock().unwrap().push(Call::User(username.to_owned()));
        self.delay(username).await;
        self.users
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or(Err(ApiError::NotFound))
    }

    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepositorySummary>, ApiError> {
        self.calls.lock().unwrap().push(Call::Repos(username.to_owned()));
        self.repos
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn search_users(&self, query: &str) -> Result<Vec<SearchUser>, ApiError> {
        self.calls.lock().unwrap().push(Call::Search(query.to_owned()));
        self.delay(query).await;
        self.search
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub copied: Arc<Mutex<Vec<String>>>,
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> anyhow::Result<()> {
        self.copied.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

pub fn profile(login: &str) -> Profile {
    Profile {
        login: login.to_owned(),
        name: Some(format!("{login} name")),
        bio: None,
        location: None,
        company: None,
        public_repos: 12,
        followers: 1234,
        following: 5,
        public_gists: 0,
        html_url: format!("https://github.com/{login}"),
        avatar_url: format!("https://avatars.example/{login}"),
    }
}

pub fn repo(name: &str) -> RepositorySummary {
    RepositorySummary {
        name: name.to_owned(),
        html_url: format!("https://github.com/someone/{name}"),
        description: None,
        language: Some("Rust".to_owned()),
        stargazers_count: 1,
        forks_count: 0,
        open_issues_count: 0,
    }
}

pub fn search_user(login: &str) -> SearchUser {
    SearchUser {
        login: login.to_owned(),
        avatar_url: format!("https://avatars.example/{login}"),
    }
}

pub fn base_url() -> Url {
    Url::parse("https://finder.example/").unwrap()
}

pub fn finder(api: &Arc<FakeApi>) -> Finder {
    finder_at(api, Location::new(base_url()))
}

pub fn finder_at(api: &Arc<FakeApi>, location: Location) -> Finder {
    finder_over(Arc::clone(api) as Arc<dyn GitHubApi>, location)
}

/// A finder over any [`GitHubApi`], for doubles other than [`FakeApi`].
pub fn finder_over(api: Arc<dyn GitHubApi>, location: Location) -> Finder {
    Finder::new(
        api,
        location,
        Sharer::new(None, Box::new(MemoryClipboard::default())),
        Handle::current(),
    )
}

/// Lets spawned tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
