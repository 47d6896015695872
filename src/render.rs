//! Pure view-model builders for the profile panel and repository list.
//!
//! Nothing here touches the UI toolkit; `main.rs` copies these values into
//! Slint properties.

use std::time::Duration;

use crate::models::{Profile, RepositorySummary};

pub const NO_BIO: &str = "No bio available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_REPOSITORIES: &str = "No public repositories found";
pub const FALLBACK_LANGUAGE_COLOR: &str = "#8257e6";

/// Total duration of the stat count-up animation.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1000);
/// Interval between count-up frames.
pub const COUNT_UP_TICK: Duration = Duration::from_millis(16);

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("TypeScript", "#2b7489"),
    ("CSS", "#563d7c"),
    ("HTML", "#e34c26"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Swift", "#ffac45"),
    ("C++", "#f34b7d"),
    ("C#", "#178600"),
    ("Rust", "#dea584"),
    ("Kotlin", "#F18E33"),
    ("Vue", "#4fc08d"),
    ("React", "#61dafb"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub login: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub avatar_alt: String,
    /// `None` hides the location row entirely.
    pub location: Option<String>,
    /// `None` hides the company row entirely.
    pub company: Option<String>,
    pub stats: ProfileStats,
    pub profile_url: String,
}

/// Targets for the animated stat counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub repos: u64,
    pub followers: u64,
    pub following: u64,
    pub gists: u64,
}

impl ProfileStats {
    pub fn as_array(&self) -> [u64; 4] {
        [self.repos, self.followers, self.following, self.gists]
    }
}

pub fn profile_view(profile: &Profile) -> ProfileView {
    ProfileView {
        login: profile.login.clone(),
        display_name: non_blank(profile.name.as_deref())
            .unwrap_or(profile.login.as_str())
            .to_owned(),
        bio: non_blank(profile.bio.as_deref())
            .unwrap_or(NO_BIO)
            .to_owned(),
        avatar_url: profile.avatar_url.clone(),
        avatar_alt: format!("{}'s avatar", profile.login),
        location: non_blank(profile.location.as_deref()).map(str::to_owned),
        company: non_blank(profile.company.as_deref()).map(str::to_owned),
        stats: ProfileStats {
            repos: profile.public_repos,
            followers: profile.followers,
            following: profile.following,
            gists: profile.public_gists,
        },
        profile_url: profile.html_url.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoListView {
    /// Shown instead of an empty list.
    Placeholder(&'static str),
    Cards(Vec<RepoCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCard {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: Option<LanguageBadge>,
    pub stars: u64,
    pub forks: u64,
    /// Only present when there is at least one open issue.
    pub open_issues: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBadge {
    pub name: String,
    pub color: &'static str,
}

pub fn repo_list_view(repos: &[RepositorySummary]) -> RepoListView {
    if repos.is_empty() {
        return RepoListView::Placeholder(NO_REPOSITORIES);
    }

    RepoListView::Cards(repos.iter().map(repo_card).collect())
}

fn repo_card(repo: &RepositorySummary) -> RepoCard {
    RepoCard {
        name: repo.name.clone(),
        url: repo.html_url.clone(),
        description: non_blank(repo.description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
            .to_owned(),
        language: non_blank(repo.language.as_deref()).map(|name| LanguageBadge {
            name: name.to_owned(),
            color: language_color(name),
        }),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        open_issues: (repo.open_issues_count > 0).then_some(repo.open_issues_count),
    }
}

/// Badge colour for a language; unknown languages share one fallback colour.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map_or(FALLBACK_LANGUAGE_COLOR, |(_, color)| *color)
}

/// Formats a count with comma thousands separators, e.g. `1234` as `1,234`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Frames of a stat counter animating from 0 to `target`.
///
/// Each frame adds `target / steps` (in integer arithmetic), and the last
/// frame is clamped to exactly `target`, so the sequence never overshoots.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: u64,
    step: u64,
    steps: u64,
    done: u64,
}

impl CountUp {
    pub fn new(target: u64) -> Self {
        let steps = count_up_steps();
        Self {
            target,
            step: target.div_ceil(steps),
            steps,
            done: 0,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.done >= self.steps
    }
}

impl Iterator for CountUp {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.is_finished() {
            return None;
        }
        self.done += 1;
        let value = self.step.saturating_mul(self.done).min(self.target);
        if value == self.target {
            self.done = self.steps;
        }
        Some(value)
    }
}

fn count_up_steps() -> u64 {
    let steps = COUNT_UP_DURATION.as_millis() / COUNT_UP_TICK.as_millis();
    u64::try_from(steps).unwrap_or(u64::MAX).max(1)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
