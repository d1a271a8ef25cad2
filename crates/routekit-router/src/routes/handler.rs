//! Shareable route handlers.
//!
//! A [`Handler`] is attached to one or more route records. The router tracks
//! the handlers of the current route by `Arc` identity, so a handler shared
//! between two records receives `update` rather than `init` when navigation
//! moves from one record to the other.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::hooks::{guard, hook, Guard, Hook, Next};
use super::route::Route;

/// Lifecycle callbacks that can be shared between route records.
///
/// # Examples
///
/// ```
/// use routekit_router::routes::{Handler, Next, RouteSpec};
///
/// let nav = Handler::new()
///     .before_init(|_to, _from| async { Next::Continue })
///     .init(|to, _from| println!("entered {}", to.path))
///     .shared();
///
/// let spec = RouteSpec::new("/docs").handler(nav.clone());
/// # drop(spec);
/// ```
#[derive(Clone, Default)]
pub struct Handler {
    name: Option<String>,
    pub(crate) before_init: Option<Guard>,
    pub(crate) init: Option<Hook>,
    pub(crate) before_update: Option<Guard>,
    pub(crate) update: Option<Hook>,
    pub(crate) unload: Option<Hook>,
}

impl Handler {
    /// Creates a handler with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a name shown in logs and `Debug` output.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Guard run when the handler becomes active.
    #[must_use]
    pub fn before_init<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Route>, Arc<Route>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Next> + Send + 'static,
    {
        self.before_init = Some(guard(f));
        self
    }

    /// Hook run when the handler becomes active.
    #[must_use]
    pub fn init<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.init = Some(hook(f));
        self
    }

    /// Guard run when the handler stays active across a navigation.
    #[must_use]
    pub fn before_update<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Route>, Arc<Route>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Next> + Send + 'static,
    {
        self.before_update = Some(guard(f));
        self
    }

    /// Hook run when the handler stays active across a navigation.
    #[must_use]
    pub fn update<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.update = Some(hook(f));
        self
    }

    /// Hook run when the handler is deactivated.
    #[must_use]
    pub fn unload<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.unload = Some(hook(f));
        self
    }

    /// Returns the handler's name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Moves the handler behind an `Arc` so it can be attached to records.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("before_init", &self.before_init.is_some())
            .field("init", &self.init.is_some())
            .field("before_update", &self.before_update.is_some())
            .field("update", &self.update.is_some())
            .field("unload", &self.unload.is_some())
            .finish()
    }
}

/// Returns `true` if `list` holds `handler` (by identity).
pub(crate) fn contains(list: &[Arc<Handler>], handler: &Arc<Handler>) -> bool {
    list.iter().any(|h| Arc::ptr_eq(h, handler))
}
