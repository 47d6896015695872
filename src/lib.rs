//! GitHub user finder: profile lookup, debounced suggestions and sharing,
//! independent of the window that displays them.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod client;
pub mod config;
pub mod error;
pub mod finder;
pub mod forward;
pub mod location;
pub mod lookup;
pub mod models;
pub mod render;
pub mod share;
pub mod suggest;
pub mod view;

pub use client::{GitHubApi, GitHubClient};
pub use config::Config;
pub use error::{ApiError, LookupError};
pub use finder::Finder;
pub use location::Location;
pub use lookup::LookupOutcome;
pub use view::ViewState;

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
