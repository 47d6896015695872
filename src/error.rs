//! Error taxonomy for the lookup pipeline.
//!
//! `ApiError` classifies what the HTTP layer saw; `LookupError` is what the
//! user is told. Every `LookupError` renders as one line for the error banner.

use reqwest::StatusCode;
use thiserror::Error;

/// Outcome classification of a single GitHub API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("GitHub API error ({status})")]
    Status { status: StatusCode },

    #[error("{0}")]
    Network(String),

    #[error("failed to decode GitHub response: {0}")]
    Decode(String),
}

impl ApiError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            Self::NotFound
        } else {
            Self::Status { status }
        }
    }
}

/// Failures surfaced by the Profile Lookup Flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter a GitHub username")]
    Validation,

    #[error("User not found. Please try another username.")]
    NotFound,

    #[error("Failed to fetch user data.")]
    Fetch,

    #[error("{0}")]
    Network(String),
}

impl From<ApiError> for LookupError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound,
            ApiError::Status { .. } | ApiError::Decode(_) => Self::Fetch,
            ApiError::Network(message) => Self::Network(message),
        }
    }
}
