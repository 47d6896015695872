//! The window's stand-in for a browser address bar.
//!
//! A location is a page URL whose `user` query parameter names the last
//! successfully looked-up identifier. Each successful lookup pushes one entry.

use reqwest::Url;

pub const USER_PARAM: &str = "user";

#[derive(Debug, Clone)]
pub struct Location {
    base: Url,
    history: Vec<Url>,
}

impl Location {
    pub fn new(base: Url) -> Self {
        let base = strip(base);
        Self {
            history: vec![base.clone()],
            base,
        }
    }

    /// Builds the initial location from an optional launch argument, which
    /// may be a full page URL (`https://host/path?user=octocat`) or a bare
    /// username. Anything else leaves the location at `base`.
    pub fn from_launch(base: Url, launch: Option<&str>) -> Self {
        let Some(raw) = launch.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::new(base);
        };

        match Url::parse(raw) {
            Ok(url) if !url.cannot_be_a_base() => {
                let user = user_param(&url);
                let mut location = Self::new(url);
                if let Some(user) = user {
                    location.history = vec![user_url(&location.base, &user)];
                }
                location
            }
            _ => {
                let mut location = Self::new(base);
                location.history = vec![user_url(&location.base, raw)];
                location
            }
        }
    }

    pub fn current(&self) -> &Url {
        self.history.last().unwrap_or(&self.base)
    }

    /// The `user` parameter of the current entry, if any.
    pub fn user(&self) -> Option<String> {
        user_param(self.current())
    }

    pub fn push_user(&mut self, user: &str) {
        self.history.push(user_url(&self.base, user));
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `origin + path + ?user=...` for sharing.
    pub fn share_url(&self, user: &str) -> Url {
        user_url(&self.base, user)
    }
}

fn strip(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn user_url(base: &Url, user: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair(USER_PARAM, user);
    url
}

fn user_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == USER_PARAM)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
