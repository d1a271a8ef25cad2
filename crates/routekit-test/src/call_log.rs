//! Ordered capture of hook invocations.
//!
//! [`CallLog`] hands out hooks, guards, and error callbacks that append a
//! label to a shared list when they run, so tests can assert the exact order
//! in which the router invoked them.
//!
//! ## Example
//!
//! ```rust
//! use routekit_router::RouteSpec;
//! use routekit_test::call_log::CallLog;
//!
//! let log = CallLog::new();
//! let spec = RouteSpec::new("/")
//!     .before(log.guard("before"))
//!     .init(log.hook("init"));
//! # drop(spec);
//! assert!(log.is_empty());
//! ```

use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};

use routekit_core::RouterError;
use routekit_router::routes::{error_callback, ErrorCallback};
use routekit_router::{Next, Route};

/// A shared, ordered list of labels.
///
/// Thread-safe via `Arc<Mutex<...>>`; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a label.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("CallLog lock poisoned")
            .push(entry.into());
    }

    /// Returns every label recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("CallLog lock poisoned").clone()
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("CallLog lock poisoned").len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every label.
    pub fn clear(&self) {
        self.entries.lock().expect("CallLog lock poisoned").clear();
    }

    /// Counts how often `entry` was recorded.
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .expect("CallLog lock poisoned")
            .iter()
            .filter(|e| *e == entry)
            .count()
    }

    /// Returns a hook that records `label`.
    pub fn hook(&self, label: &str) -> impl Fn(&Route, &Route) + Send + Sync + 'static {
        let log = self.clone();
        let label = label.to_string();
        move |_to: &Route, _from: &Route| log.record(label.clone())
    }

    /// Returns a guard that records `label` and continues.
    pub fn guard(
        &self,
        label: &str,
    ) -> impl Fn(Arc<Route>, Arc<Route>) -> Ready<Next> + Send + Sync + 'static {
        self.guard_with(label, Next::Continue)
    }

    /// Returns a guard that records `label` and resolves to `next`.
    pub fn guard_with(
        &self,
        label: &str,
        next: Next,
    ) -> impl Fn(Arc<Route>, Arc<Route>) -> Ready<Next> + Send + Sync + 'static {
        let log = self.clone();
        let label = label.to_string();
        move |_to: Arc<Route>, _from: Arc<Route>| {
            log.record(label.clone());
            ready(next.clone())
        }
    }

    /// Returns an error callback that records the error message.
    pub fn error_callback(&self) -> ErrorCallback {
        let log = self.clone();
        error_callback(move |err: &RouterError| log.record(err.to_string()))
    }

    /// Returns an error closure that records `label: message`.
    pub fn error_hook(&self, label: &str) -> impl Fn(&RouterError) + Send + Sync + 'static {
        let log = self.clone();
        let label = label.to_string();
        move |err: &RouterError| log.record(format!("{label}: {err}"))
    }

    /// Asserts the recorded labels equal `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the labels differ.
    pub fn assert_entries(&self, expected: &[&str]) {
        let actual = self.entries();
        assert_eq!(
            actual, expected,
            "Expected calls {expected:?}, but got {actual:?}"
        );
    }
}
