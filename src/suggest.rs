//! Debounced username suggestions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::client::{GitHubApi, SUGGESTIONS_PER_PAGE};
use crate::lock;
use crate::models::{SearchUser, SuggestionList};

/// Quiet period after the last edit before suggestions are fetched.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);
/// Shortest trimmed input, in characters, that is worth suggesting for.
pub const MIN_QUERY_CHARS: usize = 3;

pub struct SuggestionFlow {
    api: Arc<dyn GitHubApi>,
    list: watch::Sender<Option<SuggestionList>>,
    generation: AtomicU64,
    pending: Mutex<Option<AbortHandle>>,
    /// Trimmed text of the latest edit; responses for anything else are stale.
    latest: Mutex<String>,
    runtime: Handle,
}

impl SuggestionFlow {
    pub fn new(api: Arc<dyn GitHubApi>, runtime: Handle) -> Self {
        let (list, _) = watch::channel(None);
        Self {
            api,
            list,
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
            latest: Mutex::new(String::new()),
            runtime,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SuggestionList>> {
        self.list.subscribe()
    }

    pub fn current(&self) -> Option<SuggestionList> {
        self.list.borrow().clone()
    }

    /// Candidate at `index` of the visible dropdown.
    pub fn get(&self, index: usize) -> Option<SearchUser> {
        self.list
            .borrow()
            .as_ref()
            .and_then(|list| list.users.get(index).cloned())
    }

    /// Handles one input edit: cancels whatever is pending and, for long
    /// enough input, schedules a fetch after the quiet period.
    pub fn on_input(self: &Arc<Self>, text: &str) {
        let generation = self.cancel_pending();
        let query = text.trim().to_owned();
        *lock(&self.latest) = query.clone();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.list.send_if_modified(clear);
            return;
        }

        let flow = Arc::clone(self);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(QUIET_PERIOD).await;
            flow.fetch(query, generation).await;
        });
        *lock(&self.pending) = Some(task.abort_handle());
    }

    /// Removes the dropdown and drops any pending or in-flight request.
    pub fn dismiss(&self) {
        self.cancel_pending();
        if self.list.send_if_modified(clear) {
            debug!("suggestions dismissed");
        }
    }

    fn cancel_pending(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(pending) = lock(&self.pending).take() {
            pending.abort();
        }
        generation
    }

    async fn fetch(&self, query: String, generation: u64) {
        debug!(%query, "fetching suggestions");
        let mut users = match self.api.search_users(&query).await {
            Ok(users) => users,
            Err(e) => {
                warn!(%query, error = %e, "suggestion lookup failed");
                return;
            }
        };
        users.truncate(SUGGESTIONS_PER_PAGE);

        self.list.send_if_modified(|list| {
            let current = self.generation.load(Ordering::SeqCst) == generation
                && *lock(&self.latest) == query;
            if !current {
                debug!(%query, "dropping stale suggestions");
                return false;
            }
            if users.is_empty() {
                return clear(list);
            }
            *list = Some(SuggestionList { query, users });
            true
        });
    }
}

fn clear(list: &mut Option<SuggestionList>) -> bool {
    list.take().is_some()
}
