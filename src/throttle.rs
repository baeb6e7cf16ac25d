//! Rate limiting for scroll notification bursts.

use crate::types::ScrollCallback;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wraps a callback so it runs at most once per interval.
///
/// Leading-edge semantics: the first call in a window runs immediately
/// and opens the window; calls landing inside an open window are dropped.
/// A zero interval disables throttling entirely.
pub struct Throttle {
    interval: Duration,
    last_run: Mutex<Option<Instant>>,
    inner: Box<dyn Fn() + Send + Sync>,
}

impl Throttle {
    pub fn new(interval: Duration, inner: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            last_run: Mutex::new(None),
            inner: Box::new(inner),
        }
    }

    /// Wrap a callback into a subscribable throttled callback.
    pub fn callback(interval: Duration, inner: impl Fn() + Send + Sync + 'static) -> ScrollCallback {
        let throttle = Throttle::new(interval, inner);
        Arc::new(move || throttle.call())
    }

    /// Forward one call to the wrapped callback, unless the window is open.
    pub fn call(&self) {
        if self.interval.is_zero() {
            return (self.inner)();
        }

        {
            let mut last_run = self.last_run.lock();
            match *last_run {
                Some(at) if at.elapsed() < self.interval => return,
                _ => *last_run = Some(Instant::now()),
            }
        }

        // Lock released before the callback runs, so the callback may
        // re-enter the throttle without deadlocking.
        (self.inner)()
    }
}
