use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::GitHubApi;
use crate::location::Location;
use crate::lock;
use crate::lookup::{LookupFlow, LookupOutcome};
use crate::models::SuggestionList;
use crate::render::profile_view;
use crate::share::{
    ShareOutcome, SharePayload, Sharer, Toast, COPIED_NOTICE, COPY_FAILED_NOTICE,
};
use crate::suggest::SuggestionFlow;
use crate::view::ViewState;

/// Everything the window talks to: the shared query text, both flows, the
/// location, and sharing.
pub struct Finder {
    query: Mutex<String>,
    lookup: Arc<LookupFlow>,
    suggestions: Arc<SuggestionFlow>,
    location: Arc<Mutex<Location>>,
    sharer: Sharer,
    toast: Arc<Toast>,
}

impl Finder {
    pub fn new(
        api: Arc<dyn GitHubApi>,
        location: Location,
        sharer: Sharer,
        runtime: Handle,
    ) -> Self {
        let location = Arc::new(Mutex::new(location));
        Self {
            query: Mutex::new(String::new()),
            lookup: Arc::new(LookupFlow::new(
                Arc::clone(&api),
                Arc::clone(&location),
                runtime.clone(),
            )),
            suggestions: Arc::new(SuggestionFlow::new(api, runtime.clone())),
            location,
            sharer,
            toast: Arc::new(Toast::new(runtime)),
        }
    }

    pub fn query(&self) -> String {
        lock(&self.query).clone()
    }

    pub fn view(&self) -> ViewState {
        self.lookup.state()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<ViewState> {
        self.lookup.subscribe()
    }

    pub fn suggestions(&self) -> Option<SuggestionList> {
        self.suggestions.current()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<Option<SuggestionList>> {
        self.suggestions.subscribe()
    }

    pub fn toast(&self) -> Option<String> {
        self.toast.current()
    }

    pub fn subscribe_toast(&self) -> watch::Receiver<Option<String>> {
        self.toast.subscribe()
    }

    pub fn location(&self) -> Location {
        lock(&self.location).clone()
    }

    /// The user edited the search box.
    pub fn edit(&self, text: &str) {
        *lock(&self.query) = text.to_owned();
        self.suggestions.on_input(text);
    }

    /// Search button or Enter: look up the current query.
    pub fn submit(&self) -> JoinHandle<LookupOutcome> {
        self.suggestions.dismiss();
        let query = self.query();
        self.lookup.start(&query)
    }

    /// Replaces the query without scheduling suggestions, then submits it.
    pub fn search(&self, text: &str) -> JoinHandle<LookupOutcome> {
        *lock(&self.query) = text.to_owned();
        self.submit()
    }

    /// Picks a dropdown entry. Returns `None` if `index` is not on screen.
    pub fn select_suggestion(&self, index: usize) -> Option<JoinHandle<LookupOutcome>> {
        let user = self.suggestions.get(index)?;
        debug!(login = %user.login, "suggestion selected");
        *lock(&self.query) = user.login.clone();
        self.suggestions.dismiss();
        Some(self.lookup.start(&user.login))
    }

    /// A click landed outside the dropdown and the search box.
    pub fn dismiss_suggestions(&self) {
        self.suggestions.dismiss();
    }

    /// Looks up the location's `user` parameter, if it has one.
    pub fn restore(&self) -> Option<JoinHandle<LookupOutcome>> {
        let user = lock(&self.location).user()?;
        *lock(&self.query) = user;
        Some(self.submit())
    }

    pub fn share(&self) -> ShareOutcome {
        let user = self.query().trim().to_owned();
        if user.is_empty() {
            debug!("nothing to share");
            return ShareOutcome::Skipped;
        }

        let display_name = self
            .view()
            .as_showing()
            .map_or_else(|| user.clone(), |showing| {
                profile_view(&showing.profile).display_name
            });
        let payload = SharePayload::new(&lock(&self.location), &user, &display_name);

        let outcome = self.sharer.share(&payload);
        match outcome {
            ShareOutcome::Copied => self.toast.show(COPIED_NOTICE),
            ShareOutcome::CopyFailed => self.toast.show(COPY_FAILED_NOTICE),
            ShareOutcome::Delegated | ShareOutcome::Skipped => {}
        }
        outcome
    }
}
