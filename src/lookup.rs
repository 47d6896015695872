//! Profile Lookup Flow.
//!
//! Every call to [`LookupFlow::start`] takes a fresh ticket and aborts the
//! previous in-flight lookup. A completion only reaches the view state (and
//! the location) while its ticket is still the newest one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::client::{GitHubApi, REPOS_PER_PAGE};
use crate::error::LookupError;
use crate::location::Location;
use crate::lock;
use crate::view::{ViewState, REPOS_UNAVAILABLE};

/// How one lookup invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Shown,
    Failed(LookupError),
    /// A newer lookup started before this one finished.
    Superseded,
}

pub struct LookupFlow {
    api: Arc<dyn GitHubApi>,
    location: Arc<Mutex<Location>>,
    state: watch::Sender<ViewState>,
    ticket: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
    runtime: Handle,
}

impl LookupFlow {
    pub fn new(api: Arc<dyn GitHubApi>, location: Arc<Mutex<Location>>, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            api,
            location,
            state,
            ticket: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            runtime,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Starts a lookup for `raw`, superseding any lookup still in flight.
    ///
    /// Blank input is rejected synchronously without a request. Otherwise the
    /// state is `Loading` by the time this returns.
    pub fn start(self: &Arc<Self>, raw: &str) -> JoinHandle<LookupOutcome> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = lock(&self.in_flight).take() {
            previous.abort();
        }

        let query = raw.trim().to_owned();
        if query.is_empty() {
            self.state
                .send_replace(ViewState::Error(LookupError::Validation.to_string()));
            return self
                .runtime
                .spawn(async { LookupOutcome::Failed(LookupError::Validation) });
        }

        info!(user = %query, ticket, "looking up profile");
        self.state.send_replace(ViewState::Loading);

        let flow = Arc::clone(self);
        let handle = self.runtime.spawn(async move { flow.run(query, ticket).await });
        *lock(&self.in_flight) = Some(handle.abort_handle());
        handle
    }

    async fn run(&self, query: String, ticket: u64) -> LookupOutcome {
        let mut settle = Settle::new(self, ticket);

        let (next, outcome) = match self.fetch(&query).await {
            Ok(showing) => (showing, LookupOutcome::Shown),
            Err(e) => {
                info!(user = %query, error = %e, "profile lookup failed");
                (ViewState::Error(e.to_string()), LookupOutcome::Failed(e))
            }
        };

        let push = matches!(outcome, LookupOutcome::Shown).then_some(query.as_str());
        if settle.commit(next, push) {
            outcome
        } else {
            debug!(user = %query, ticket, "discarding superseded lookup result");
            LookupOutcome::Superseded
        }
    }

    async fn fetch(&self, query: &str) -> Result<ViewState, LookupError> {
        let profile = self.api.fetch_user(query).await?;

        let (repos, notice) = match self.api.fetch_repos(query).await {
            Ok(mut repos) => {
                repos.truncate(REPOS_PER_PAGE);
                (repos, None)
            }
            Err(e) => {
                warn!(user = %query, error = %e, "repository fetch failed, showing profile only");
                (Vec::new(), Some(REPOS_UNAVAILABLE))
            }
        };

        Ok(ViewState::showing(profile, repos, notice))
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.ticket.load(Ordering::SeqCst) == ticket
    }
}

/// Clears the loader for one ticket however its task ends.
///
/// `commit` publishes the final state; if the task is dropped first (aborted
/// or panicked) while it is still the newest lookup, the state falls back to
/// `Idle`.
struct Settle<'a> {
    flow: &'a LookupFlow,
    ticket: u64,
    armed: bool,
}

impl<'a> Settle<'a> {
    fn new(flow: &'a LookupFlow, ticket: u64) -> Self {
        Self {
            flow,
            ticket,
            armed: true,
        }
    }

    /// Returns `false` without touching anything when the ticket is stale.
    fn commit(&mut self, next: ViewState, push_user: Option<&str>) -> bool {
        self.armed = false;
        let flow = self.flow;
        let ticket = self.ticket;
        flow.state.send_if_modified(move |state| {
            if !flow.is_current(ticket) {
                return false;
            }
            if let Some(user) = push_user {
                lock(&flow.location).push_user(user);
            }
            *state = next;
            true
        })
    }
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let flow = self.flow;
        let ticket = self.ticket;
        flow.state.send_if_modified(|state| {
            if flow.is_current(ticket) && state.is_loading() {
                *state = ViewState::Idle;
                true
            } else {
                false
            }
        });
    }
}
