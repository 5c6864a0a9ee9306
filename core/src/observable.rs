//! Observable state cell.
//!
//! A value plus a change notification. Hosts hold a `watch::Receiver` from
//! `subscribe` and re-render when it reports a change. Every write notifies,
//! including writes of an equal value.

use tokio::sync::watch;

#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the value and notify subscribers. Stores the value even when
    /// nobody is subscribed.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}
