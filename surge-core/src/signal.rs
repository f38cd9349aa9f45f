//! Cooperative stop signal
//!
//! Workers check the signal at the top of their loop and sleep on it
//! between requests, so a stop request takes effect within one pacing
//! interval. In-flight HTTP calls are never interrupted.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Clonable stop flag shared by the coordinator and its workers
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request stop, waking any worker mid pacing sleep
    pub fn trigger(&self) {
        let mut stopped = self.inner.stopped.lock().unwrap();
        *stopped = true;
        self.inner.condvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.stopped.lock().unwrap()
    }

    /// Sleep up to `timeout`, returning early if the signal fires
    ///
    /// Returns true when the signal is set, so callers can use the return
    /// value directly as their exit condition.
    pub fn sleep(&self, timeout: Duration) -> bool {
        let stopped = self.inner.stopped.lock().unwrap();
        let (stopped, _) = self
            .inner
            .condvar
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .unwrap();
        *stopped
    }
}
