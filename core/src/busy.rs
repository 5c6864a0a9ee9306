//! Boolean busy flag.

use tokio::sync::watch;

use crate::observable::Observable;

/// Tracks whether an operation is in flight.
///
/// `start` and `stop` are idempotent; the last call wins.
#[derive(Debug)]
pub struct BusyFlag {
    is_loading: Observable<bool>,
}

impl BusyFlag {
    pub fn new(initial: bool) -> Self {
        Self {
            is_loading: Observable::new(initial),
        }
    }

    pub fn start(&self) {
        self.is_loading.set(true);
    }

    pub fn stop(&self) {
        self.is_loading.set(false);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    /// Notified on every `start`/`stop`.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.is_loading.subscribe()
    }
}

impl Default for BusyFlag {
    fn default() -> Self {
        Self::new(false)
    }
}
