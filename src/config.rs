use std::env;

use reqwest::Url;
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PAGE_URL: &str = "https://github-finder.app/";
pub const DEFAULT_USER_AGENT: &str = "rust-github-finder";

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the GitHub REST API.
    pub api_base: Url,
    /// Origin and path that location and share URLs are built on.
    pub page_url: Url,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_url(DEFAULT_API_BASE),
            page_url: default_url(DEFAULT_PAGE_URL),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to the
    /// defaults for missing or malformed values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_base: try_url(&lookup, "GITHUB_FINDER_API_BASE", defaults.api_base),
            page_url: try_url(&lookup, "GITHUB_FINDER_PAGE_URL", defaults.page_url),
            user_agent: lookup("GITHUB_FINDER_USER_AGENT")
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.user_agent),
        }
    }
}

fn try_url<F>(lookup: &F, key: &str, default: Url) -> Url
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    match Url::parse(raw.trim()) {
        Ok(url) if !url.cannot_be_a_base() => url,
        Ok(_) => {
            warn!("Invalid {key} value: {raw} cannot be a base URL");
            default
        }
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            default
        }
    }
}

fn default_url(raw: &'static str) -> Url {
    Url::parse(raw).expect("default URLs are valid")
}
