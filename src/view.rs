use crate::models::{Profile, RepositorySummary};

/// Shown beside an empty repository list when only the repository fetch failed.
pub const REPOS_UNAVAILABLE: &str = "Repositories could not be loaded.";

/// Which of the loader, error banner or profile panel is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Showing(Box<Showing>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Showing {
    pub profile: Profile,
    pub repos: Vec<RepositorySummary>,
    /// Inline notice for the repository section, if it could not be loaded.
    pub repos_notice: Option<&'static str>,
}

/// Panel visibility derived from a [`ViewState`]. At most one flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panels {
    pub loader: bool,
    pub error: bool,
    pub profile: bool,
}

impl ViewState {
    pub fn showing(
        profile: Profile,
        repos: Vec<RepositorySummary>,
        repos_notice: Option<&'static str>,
    ) -> Self {
        Self::Showing(Box::new(Showing {
            profile,
            repos,
            repos_notice,
        }))
    }

    pub fn panels(&self) -> Panels {
        match self {
            Self::Idle => Panels::default(),
            Self::Loading => Panels {
                loader: true,
                ..Panels::default()
            },
            Self::Error(_) => Panels {
                error: true,
                ..Panels::default()
            },
            Self::Showing(_) => Panels {
                profile: true,
                ..Panels::default()
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn as_showing(&self) -> Option<&Showing> {
        match self {
            Self::Showing(showing) => Some(&**showing),
            _ => None,
        }
    }
}
