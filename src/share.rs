//! Share a looked-up profile, natively when possible, else via the clipboard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::location::Location;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);
pub const COPIED_NOTICE: &str = "Profile link copied to clipboard!";
pub const COPY_FAILED_NOTICE: &str = "Could not copy profile link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Url,
}

impl SharePayload {
    pub fn new(location: &Location, user: &str, display_name: &str) -> Self {
        Self {
            title: format!("{display_name} - GitHub Profile"),
            text: format!("Check out {display_name}'s GitHub profile!"),
            url: location.share_url(user),
        }
    }
}

/// A platform share sheet.
pub trait NativeShare: Send + Sync {
    fn share(&self, payload: &SharePayload) -> Result<()>;
}

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// The OS clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text.to_owned()))
            .context("Failed to write to the system clipboard")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the native share target (whether or not it succeeded).
    Delegated,
    Copied,
    CopyFailed,
    /// No identifier to share.
    Skipped,
}

pub struct Sharer {
    native: Option<Box<dyn NativeShare>>,
    clipboard: Box<dyn Clipboard>,
}

impl Default for Sharer {
    fn default() -> Self {
        Self::new(None, Box::new(SystemClipboard))
    }
}

impl Sharer {
    pub fn new(native: Option<Box<dyn NativeShare>>, clipboard: Box<dyn Clipboard>) -> Self {
        Self { native, clipboard }
    }

    pub fn share(&self, payload: &SharePayload) -> ShareOutcome {
        if let Some(native) = &self.native {
            if let Err(e) = native.share(payload) {
                warn!(error = %e, "Error sharing");
            }
            return ShareOutcome::Delegated;
        }

        match self.clipboard.copy(payload.url.as_str()) {
            Ok(()) => ShareOutcome::Copied,
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                ShareOutcome::CopyFailed
            }
        }
    }
}

/// A single transient notice that clears itself after [`TOAST_DURATION`].
pub struct Toast {
    message: watch::Sender<Option<String>>,
    generation: AtomicU64,
    runtime: Handle,
}

impl Toast {
    pub fn new(runtime: Handle) -> Self {
        let (message, _) = watch::channel(None);
        Self {
            message,
            generation: AtomicU64::new(0),
            runtime,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }

    pub fn current(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    /// Shows `text`, replacing any visible notice. Only the newest notice's
    /// timer may clear it.
    pub fn show(self: &Arc<Self>, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.message.send_replace(Some(text.to_owned()));

        let toast = Arc::clone(self);
        self.runtime.spawn(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            toast.message.send_if_modified(|message| {
                if toast.generation.load(Ordering::SeqCst) != generation {
                    return false;
                }
                debug!("toast dismissed");
                message.take().is_some()
            });
        });
    }
}
