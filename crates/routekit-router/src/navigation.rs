//! The navigation controller.
//!
//! [`NavigationController`] owns the current route and the global hooks, and
//! runs one navigation at a time through a fixed pipeline:
//!
//! 1. global before-guards, in registration order;
//! 2. `before` guards of the matched records, root first;
//! 3. `before_init` / `before_update` guards of the route's handlers;
//! 4. the history entry is pushed or replaced;
//! 5. commit: `unload` for exited records then exited handlers, `init` or
//!    `update` (then `pop` on history moves) for matched records, then `init`
//!    or `update` for handlers;
//! 6. `after` hooks of the matched records, then global after-hooks.
//!
//! A guard that resolves to [`Next::Abort`] or [`Next::Fail`], or a history
//! that refuses the new entry, stops the pipeline before step 5. The current
//! route is left as it was, and every error callback is called once with the
//! error.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use routekit_core::logging::navigation_span;
use routekit_core::RouterResult;

use crate::history::{History, HistoryState};
use crate::routes::handler::{self, Handler};
use crate::routes::{ErrorCallback, Guard, Hook, Next, Route, ScrollBehavior};

/// How a navigation affects the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Evaluate the target without touching the history.
    Run,
    /// Add a history entry on success.
    Push,
    /// Overwrite the current history entry on success.
    Replace,
    /// The history cursor already moved (back/forward).
    Pop,
}

impl NavigationKind {
    /// Returns a short lowercase label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Push => "push",
            Self::Replace => "replace",
            Self::Pop => "pop",
        }
    }
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current route and runs the hook pipeline.
pub struct NavigationController {
    current: Arc<Route>,
    active_handlers: Vec<Arc<Handler>>,
    started: bool,
    before_each: Vec<Guard>,
    after_each: Vec<Hook>,
    error_callbacks: Vec<ErrorCallback>,
    scroll_behavior: Option<ScrollBehavior>,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    /// Creates a controller positioned on [`Route::start`].
    pub fn new() -> Self {
        Self {
            current: Arc::new(Route::start()),
            active_handlers: Vec::new(),
            started: false,
            before_each: Vec::new(),
            after_each: Vec::new(),
            error_callbacks: Vec::new(),
            scroll_behavior: None,
        }
    }

    /// Returns the current route.
    pub fn current(&self) -> Arc<Route> {
        Arc::clone(&self.current)
    }

    /// Returns the handlers active on the current route.
    pub fn active_handlers(&self) -> &[Arc<Handler>] {
        &self.active_handlers
    }

    /// Returns `true` once a navigation has committed.
    pub const fn has_started(&self) -> bool {
        self.started
    }

    /// Registers a global before-guard.
    pub fn add_before_each(&mut self, guard: Guard) {
        self.before_each.push(guard);
    }

    /// Registers a global after-hook.
    pub fn add_after_each(&mut self, hook: Hook) {
        self.after_each.push(hook);
    }

    /// Registers an error callback.
    pub fn add_error_callback(&mut self, callback: ErrorCallback) {
        self.error_callbacks.push(callback);
    }

    /// Sets the callback whose result is saved as the state of new history
    /// entries.
    pub fn set_scroll_behavior(&mut self, behavior: ScrollBehavior) {
        self.scroll_behavior = Some(behavior);
    }

    /// Drops every hook and callback and returns to [`Route::start`].
    pub fn reset(&mut self) {
        self.before_each.clear();
        self.after_each.clear();
        self.error_callbacks.clear();
        self.scroll_behavior = None;
        self.active_handlers.clear();
        self.current = Arc::new(Route::start());
        self.started = false;
    }

    /// Runs the pipeline for `to` and commits it on success.
    ///
    /// Navigating to the current full path after the first navigation is a
    /// no-op that returns the current route.
    ///
    /// # Errors
    ///
    /// Returns the error a guard stopped the navigation with, or an error from
    /// the history.
    pub async fn navigate(
        &mut self,
        history: &mut dyn History,
        to: Route,
        kind: NavigationKind,
    ) -> RouterResult<Arc<Route>> {
        let span = navigation_span(kind.as_str(), &to.full_path);
        self.run_pipeline(history, to, kind).instrument(span).await
    }

    async fn run_pipeline(
        &mut self,
        history: &mut dyn History,
        to: Route,
        kind: NavigationKind,
    ) -> RouterResult<Arc<Route>> {
        let from = Arc::clone(&self.current);
        if self.started && to.full_path == from.full_path {
            debug!("Target is the current route, skipping");
            return Ok(from);
        }

        let to = Arc::new(to);
        debug!(from = %from.full_path, no_match = to.no_match, "Navigation started");

        let approved = match self.run_guards(&to, &from).await {
            Ok(()) => self.update_history(history, &to, &from, kind),
            Err(err) => Err(err),
        };
        if let Err(err) = approved {
            warn!(error = %err, "Navigation aborted");
            for callback in &self.error_callbacks {
                callback(&err);
            }
            return Err(err);
        }

        self.commit(&to, &from, kind);
        self.current = Arc::clone(&to);
        self.started = true;

        self.run_after_hooks(&to, &from);
        info!(route = ?to.name, "Navigation committed");
        Ok(to)
    }

    async fn run_guards(&self, to: &Arc<Route>, from: &Arc<Route>) -> RouterResult<()> {
        debug!(count = self.before_each.len(), "Running global before guards");
        for guard in &self.before_each {
            check(guard, to, from).await?;
        }

        if to.no_match {
            return Ok(());
        }

        debug!("Running route before guards");
        for record in &to.matched {
            if let Some(guard) = &record.before {
                check(guard, to, from).await?;
            }
        }

        debug!("Running handler before guards");
        for handler in to.handlers() {
            let guard = if handler::contains(&self.active_handlers, &handler) {
                &handler.before_update
            } else {
                &handler.before_init
            };
            if let Some(guard) = guard {
                check(guard, to, from).await?;
            }
        }

        Ok(())
    }

    fn update_history(
        &self,
        history: &mut dyn History,
        to: &Route,
        from: &Route,
        kind: NavigationKind,
    ) -> RouterResult<()> {
        let state = || {
            self.scroll_behavior
                .as_ref()
                .map_or_else(HistoryState::new, |behavior| {
                    HistoryState::with_data(behavior(to, from))
                })
        };
        match kind {
            NavigationKind::Push => history.push(state(), &to.url),
            NavigationKind::Replace => history.replace(state(), &to.url),
            NavigationKind::Run | NavigationKind::Pop => Ok(()),
        }
    }

    fn commit(&mut self, to: &Route, from: &Route, kind: NavigationKind) {
        let handlers = to.handlers();

        debug!("Unloading exited routes and handlers");
        for record in &from.matched {
            if !to.contains(record) {
                if let Some(unload) = &record.unload {
                    unload(to, from);
                }
            }
        }
        for handler in &self.active_handlers {
            if !handler::contains(&handlers, handler) {
                if let Some(unload) = &handler.unload {
                    unload(to, from);
                }
            }
        }

        if !to.no_match {
            debug!("Running init/update hooks");
            for record in &to.matched {
                let callback = if from.contains(record) {
                    &record.update
                } else {
                    &record.init
                };
                if let Some(callback) = callback {
                    callback(to, from);
                }
                if kind == NavigationKind::Pop {
                    if let Some(pop) = &record.pop {
                        pop(to, from);
                    }
                }
            }
            for handler in &handlers {
                let callback = if handler::contains(&self.active_handlers, handler) {
                    &handler.update
                } else {
                    &handler.init
                };
                if let Some(callback) = callback {
                    callback(to, from);
                }
            }
        }

        self.active_handlers = handlers;
    }

    fn run_after_hooks(&self, to: &Route, from: &Route) {
        if !to.no_match {
            for record in &to.matched {
                if let Some(after) = &record.after {
                    after(to, from);
                }
            }
        }
        for hook in &self.after_each {
            hook(to, from);
        }
    }
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("current", &self.current.full_path)
            .field("started", &self.started)
            .field("active_handlers", &self.active_handlers.len())
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .field("error_callbacks", &self.error_callbacks.len())
            .field("scroll_behavior", &self.scroll_behavior.is_some())
            .finish()
    }
}

async fn check(guard: &Guard, to: &Arc<Route>, from: &Arc<Route>) -> RouterResult<()> {
    let next: Next = guard(Arc::clone(to), Arc::clone(from)).await;
    next.into_result()
}
