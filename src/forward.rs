//! Pumps watch-channel values out to the window.

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Hands every value seen on `rx` to `deliver`, starting with the current one.
///
/// `deliver` runs synchronously on the forwarding task and must not wait on
/// anything slow; side work such as image downloads belongs in a task of its
/// own so later values are never held back. Forwarding stops when `deliver`
/// returns `false` or every sender is gone.
pub fn forward_changes<T, F>(
    runtime: &Handle,
    mut rx: watch::Receiver<T>,
    mut deliver: F,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut(T) -> bool + Send + 'static,
{
    runtime.spawn(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            if !deliver(value) {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
