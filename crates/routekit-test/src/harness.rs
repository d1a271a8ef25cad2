//! A router wired to an in-memory history for tests.
//!
//! [`TestRouter`] dereferences to [`Router`], so every registration and
//! navigation method is available directly. It adds helpers for simulating
//! the address bar and inspecting the history.
//!
//! ## Example
//!
//! ```rust
//! use routekit_router::RouteSpec;
//! use routekit_test::harness::TestRouter;
//!
//! # tokio_test::block_on(async {
//! let mut router = TestRouter::at("/blog/5");
//! router.map(vec![RouteSpec::new("/blog/:id")]).unwrap();
//! let route = router.run(None).await.unwrap();
//! assert_eq!(route.params["id"].as_i64(), Some(5));
//! # });
//! ```

use std::ops::{Deref, DerefMut};

use routekit_core::RouterSettings;
use routekit_router::{History, HistoryState, LocationContext, MemoryHistory, Router};

/// A [`Router`] on a [`MemoryHistory`].
#[derive(Debug)]
pub struct TestRouter {
    router: Router,
    context: LocationContext,
}

impl TestRouter {
    /// Creates a router with default settings positioned at `/`.
    pub fn new() -> Self {
        Self::with_settings(RouterSettings::default(), "/")
    }

    /// Creates a router with default settings positioned at `path`.
    pub fn at(path: &str) -> Self {
        Self::with_settings(RouterSettings::default(), path)
    }

    /// Creates a router with `settings` positioned at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the settings' origin is invalid or `path` cannot be parsed.
    pub fn with_settings(settings: RouterSettings, path: &str) -> Self {
        let context = LocationContext::from_settings(&settings).expect("invalid test origin");
        let url = context.parse(path).expect("invalid test path").url;
        let router = Router::builder()
            .settings(settings)
            .history(MemoryHistory::new(url))
            .build()
            .expect("failed to build test router");
        Self { router, context }
    }

    /// Points the current history entry at `path` without navigating, like
    /// editing the address bar before calling `run(None)`.
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be parsed.
    pub fn set_path(&mut self, path: &str) {
        let url = self.context.parse(path).expect("invalid test path").url;
        self.router
            .history_mut()
            .replace(HistoryState::new(), &url)
            .expect("history replace failed");
    }

    /// Returns the number of history entries.
    pub fn history_len(&self) -> usize {
        self.router.history().len()
    }

    /// Returns the router-relative path of the current history entry.
    ///
    /// # Panics
    ///
    /// Panics if the history holds an unparsable URL.
    pub fn current_path(&self) -> String {
        self.router.uri(None).expect("invalid history url").path
    }
}

impl Default for TestRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestRouter {
    type Target = Router;

    fn deref(&self) -> &Router {
        &self.router
    }
}

impl DerefMut for TestRouter {
    fn deref_mut(&mut self) -> &mut Router {
        &mut self.router
    }
}
