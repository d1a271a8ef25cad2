//! The router facade.
//!
//! [`Router`] owns the route map, the history, the global hooks, and the
//! current route. Registration methods are synchronous and chainable;
//! navigation methods are `async` and resolve once the hook pipeline has
//! finished.
//!
//! # Examples
//!
//! ```
//! use routekit_router::routes::{Next, RouteSpec};
//! use routekit_router::Router;
//!
//! # tokio_test::block_on(async {
//! let mut router = Router::builder().build().unwrap();
//! router
//!     .map(vec![
//!         RouteSpec::new("/").name("home"),
//!         RouteSpec::new("/users/:id").name("user"),
//!     ])
//!     .unwrap()
//!     .before_each(|_to, _from| async { Next::Continue });
//!
//! let route = router.push("/users/42").await.unwrap();
//! assert_eq!(route.name.as_deref(), Some("user"));
//! assert_eq!(router.history().len(), 2);
//! # });
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use routekit_core::{RouterResult, RouterSettings};

use crate::history::{History, MemoryHistory};
use crate::location::{Location, LocationContext, LocationSpec, Query};
use crate::navigation::{NavigationController, NavigationKind};
use crate::routes::{
    error_callback, guard, hook, match_location, reverse, scroll_behavior, ErrorCallback, Next,
    Params, PatternOptions, Route, RouteMap, RouteRecord, RouteSpec,
};

/// Where a navigation should go.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationTarget {
    /// A URL or path string.
    Path(String),
    /// A path with query and hash given separately.
    Location(LocationSpec),
    /// A named route with its parameters.
    Named {
        /// The route name.
        name: String,
        /// Values for the route's parameters.
        params: Params,
        /// Query parameters to append.
        query: Query,
    },
}

impl NavigationTarget {
    /// Targets a named route.
    pub fn named(name: impl Into<String>, params: Params) -> Self {
        Self::Named {
            name: name.into(),
            params,
            query: Query::new(),
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<LocationSpec> for NavigationTarget {
    fn from(spec: LocationSpec) -> Self {
        Self::Location(spec)
    }
}

/// Which index [`Router::routes`] returns when no key is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    /// Records keyed by path.
    #[default]
    Path,
    /// Records keyed by name.
    Name,
    /// Paths in matching order.
    List,
}

/// The result of [`Router::routes`].
#[derive(Debug, Clone)]
pub enum Routes {
    /// A single lookup by path or name.
    Record(Option<Arc<RouteRecord>>),
    /// A path or name index.
    Map(HashMap<String, Arc<RouteRecord>>),
    /// Paths in matching order.
    List(Vec<String>),
}

impl Routes {
    /// Returns the record of a single lookup.
    pub fn into_record(self) -> Option<Arc<RouteRecord>> {
        match self {
            Self::Record(record) => record,
            _ => None,
        }
    }

    /// Returns the index of a [`KeyType::Path`] or [`KeyType::Name`] query.
    pub fn into_map(self) -> Option<HashMap<String, Arc<RouteRecord>>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the list of a [`KeyType::List`] query.
    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Builds a [`Router`].
pub struct RouterBuilder {
    settings: RouterSettings,
    history: Option<Box<dyn History>>,
}

impl RouterBuilder {
    /// Starts from default settings and an in-memory history.
    pub fn new() -> Self {
        Self {
            settings: RouterSettings::default(),
            history: None,
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Supplies the history to navigate against.
    #[must_use]
    pub fn history(mut self, history: impl History + 'static) -> Self {
        self.history = Some(Box::new(history));
        self
    }

    /// Builds the router.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::ConfigurationError`] if the
    /// configured origin is not an absolute URL.
    pub fn build(self) -> RouterResult<Router> {
        let context = LocationContext::from_settings(&self.settings)?;
        let history = match self.history {
            Some(history) => history,
            None => Box::new(MemoryHistory::new(context.parse("/")?.url)),
        };

        Ok(Router {
            map: RouteMap::new(PatternOptions::from(&self.settings)),
            settings: self.settings,
            context,
            controller: NavigationController::new(),
            history,
        })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A client-side router.
pub struct Router {
    settings: RouterSettings,
    context: LocationContext,
    map: RouteMap,
    controller: NavigationController,
    history: Box<dyn History>,
}

impl Router {
    /// Returns a [`RouterBuilder`].
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Registers routes. Paths already registered keep their first record.
    ///
    /// # Errors
    ///
    /// Returns a registration error if a pattern is malformed or a name is
    /// taken; no route from `specs` is registered in that case.
    pub fn map(&mut self, specs: Vec<RouteSpec>) -> RouterResult<&mut Self> {
        self.map.map_routes(specs)?;
        Ok(self)
    }

    /// Installs the route used when nothing else matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the wildcard pattern cannot be compiled.
    pub fn not_found(&mut self, spec: RouteSpec) -> RouterResult<&mut Self> {
        self.map.set_not_found(spec)?;
        Ok(self)
    }

    /// Registers a global before-guard.
    pub fn before_each<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(Arc<Route>, Arc<Route>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Next> + Send + 'static,
    {
        self.controller.add_before_each(guard(f));
        self
    }

    /// Registers a global after-hook.
    pub fn after_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.controller.add_after_each(hook(f));
        self
    }

    /// Registers a callback for stopped navigations.
    pub fn on_error<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&routekit_core::RouterError) + Send + Sync + 'static,
    {
        self.controller.add_error_callback(error_callback(f));
        self
    }

    /// Registers several callbacks for stopped navigations, in order.
    pub fn on_errors(&mut self, callbacks: impl IntoIterator<Item = ErrorCallback>) -> &mut Self {
        for callback in callbacks {
            self.controller.add_error_callback(callback);
        }
        self
    }

    /// Sets the callback whose result is saved as the state of each history
    /// entry added by [`Router::push`] or [`Router::replace`].
    pub fn scroll_behavior<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Route, &Route) -> serde_json::Value + Send + Sync + 'static,
    {
        self.controller.set_scroll_behavior(scroll_behavior(f));
        self
    }

    /// Clears routes, hooks, and error callbacks, and returns to the start
    /// route. The history is kept.
    pub fn reset(&mut self) {
        self.map.reset();
        self.controller.reset();
        debug!("Router reset");
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Evaluates `target`, or the current history URL when `None`, without
    /// changing the history.
    ///
    /// # Errors
    ///
    /// Returns the error a guard stopped the navigation with, or
    /// [`routekit_core::RouterError::InvalidUrl`] for an unparsable target.
    pub async fn run(&mut self, target: Option<&str>) -> RouterResult<Arc<Route>> {
        let location = match target {
            Some(target) => self.context.parse(target)?,
            None => self.context.parse(&self.history.current_url())?,
        };
        self.navigate(location, NavigationKind::Run).await
    }

    /// Navigates to `target` and adds a history entry on success.
    ///
    /// # Errors
    ///
    /// Returns the error a guard stopped the navigation with; the history is
    /// unchanged in that case.
    pub async fn push(&mut self, target: impl Into<NavigationTarget>) -> RouterResult<Arc<Route>> {
        let location = self.resolve(&target.into())?;
        self.navigate(location, NavigationKind::Push).await
    }

    /// Navigates to `target` and overwrites the current history entry on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns the error a guard stopped the navigation with; the history is
    /// unchanged in that case.
    pub async fn replace(
        &mut self,
        target: impl Into<NavigationTarget>,
    ) -> RouterResult<Arc<Route>> {
        let location = self.resolve(&target.into())?;
        self.navigate(location, NavigationKind::Replace).await
    }

    /// Moves one entry back and navigates there.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::History`] at the start of the
    /// history, or the error a guard stopped the navigation with. A stopped
    /// navigation moves the cursor back to where it was.
    pub async fn back(&mut self) -> RouterResult<Arc<Route>> {
        self.go(-1).await
    }

    /// Moves one entry forward and navigates there.
    ///
    /// # Errors
    ///
    /// See [`Router::back`].
    pub async fn forward(&mut self) -> RouterResult<Arc<Route>> {
        self.go(1).await
    }

    /// Moves the history cursor by `delta` and navigates there.
    ///
    /// # Errors
    ///
    /// See [`Router::back`].
    pub async fn go(&mut self, delta: isize) -> RouterResult<Arc<Route>> {
        self.history.go(delta)?;

        let result = match self.context.parse(&self.history.current_url()) {
            Ok(location) => self.navigate(location, NavigationKind::Pop).await,
            Err(err) => Err(err),
        };

        if result.is_err() {
            if let Err(restore) = self.history.go(-delta) {
                warn!(error = %restore, "Could not restore history position");
            }
        }
        result
    }

    async fn navigate(
        &mut self,
        location: Location,
        kind: NavigationKind,
    ) -> RouterResult<Arc<Route>> {
        let to = match_location(&self.map, location);
        self.controller
            .navigate(self.history.as_mut(), to, kind)
            .await
    }

    fn resolve(&self, target: &NavigationTarget) -> RouterResult<Location> {
        match target {
            NavigationTarget::Path(path) => self.context.parse(path),
            NavigationTarget::Location(spec) => self.context.parse(&spec.to_url_string()),
            NavigationTarget::Named {
                name,
                params,
                query,
            } => {
                let path = self.reverse(name, params)?;
                let spec = LocationSpec {
                    path,
                    query: query.clone(),
                    hash: None,
                };
                self.context.parse(&spec.to_url_string())
            }
        }
    }

    // ── Introspection ────────────────────────────────────────────────

    /// Returns the current route.
    pub fn current_route(&self) -> Arc<Route> {
        self.controller.current()
    }

    /// Looks up registered routes.
    ///
    /// With a key, returns the record registered under that path, or else
    /// under that name. Without one, returns the index selected by
    /// `key_type`.
    pub fn routes(&self, key: Option<&str>, key_type: KeyType) -> Routes {
        if let Some(key) = key {
            return Routes::Record(self.map.get(key));
        }

        match key_type {
            KeyType::Path => Routes::Map(self.map.path_map().clone()),
            KeyType::Name => Routes::Map(self.map.name_map().clone()),
            KeyType::List => Routes::List(self.map.path_list().to_vec()),
        }
    }

    /// Parses `value`, or the current history URL when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::InvalidUrl`] for an unparsable
    /// value.
    pub fn uri(&self, value: Option<&str>) -> RouterResult<Location> {
        match value {
            Some(value) => self.context.parse(value),
            None => self.context.parse(&self.history.current_url()),
        }
    }

    /// Returns the segments of the current history URL.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::InvalidUrl`] if the history URL
    /// cannot be parsed.
    pub fn segments(&self) -> RouterResult<Vec<String>> {
        self.uri(None).map(|location| location.segments)
    }

    /// Returns one segment of the current history URL.
    ///
    /// # Errors
    ///
    /// See [`Router::segments`].
    pub fn segment(&self, index: usize) -> RouterResult<Option<String>> {
        Ok(self.segments()?.into_iter().nth(index))
    }

    /// Builds the path of a named route from parameter values.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::NotFound`] for an unknown name or
    /// a missing required parameter.
    pub fn reverse(&self, name: &str, params: &Params) -> RouterResult<String> {
        let values: HashMap<String, String> = params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        let kwargs: HashMap<&str, &str> = values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        reverse(&self.map, name, &[], &kwargs)
    }

    /// Returns the router's settings.
    pub const fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Returns the route map.
    pub const fn route_map(&self) -> &RouteMap {
        &self.map
    }

    /// Returns the history.
    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    /// Returns the history mutably, e.g. to simulate the user changing the
    /// address bar.
    pub fn history_mut(&mut self) -> &mut dyn History {
        self.history.as_mut()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("settings", &self.settings)
            .field("routes", &self.map.path_list())
            .field("controller", &self.controller)
            .field("history_len", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ParamValue;
    use routekit_core::RouterError;

    fn router() -> Router {
        let mut router = Router::builder().build().unwrap();
        router
            .map(vec![
                RouteSpec::new("/").name("home"),
                RouteSpec::new("/page1"),
                RouteSpec::new("/page2").name("page2"),
                RouteSpec::new("/users/:id").name("user"),
            ])
            .unwrap();
        router
    }

    #[tokio::test]
    async fn test_run_uses_history_url() {
        let mut router = router();
        let route = router.run(None).await.unwrap();
        assert_eq!(route.name.as_deref(), Some("home"));
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test]
    async fn test_push_and_replace() {
        let mut router = router();
        router.run(None).await.unwrap();

        router.push("page1?test=value").await.unwrap();
        assert_eq!(router.history().len(), 2);
        let uri = router.uri(None).unwrap();
        assert_eq!(uri.path, "/page1");
        assert_eq!(uri.query.get("test"), Some("value"));

        router.replace("page2").await.unwrap();
        assert_eq!(router.history().len(), 2);
        assert_eq!(router.uri(None).unwrap().path, "/page2");
    }

    #[tokio::test]
    async fn test_push_named_target() {
        let mut router = router();
        let mut params = Params::new();
        params.insert("id".into(), ParamValue::Int(7));
        let route = router
            .push(NavigationTarget::named("user", params))
            .await
            .unwrap();
        assert_eq!(route.path, "/users/7");
        assert_eq!(route.params["id"], ParamValue::Int(7));
    }

    #[tokio::test]
    async fn test_push_location_spec() {
        let mut router = router();
        let route = router
            .push(LocationSpec::new("page2").query("test", "value").hash("top"))
            .await
            .unwrap();
        assert_eq!(route.path, "/page2");
        assert_eq!(route.query.get("test"), Some("value"));
        assert_eq!(route.hash, "top");
    }

    #[tokio::test]
    async fn test_back_and_forward() {
        let mut router = router();
        router.run(None).await.unwrap();
        router.push("/page1").await.unwrap();
        router.push("/page2").await.unwrap();

        let route = router.back().await.unwrap();
        assert_eq!(route.path, "/page1");
        let route = router.forward().await.unwrap();
        assert_eq!(route.path, "/page2");
        assert!(matches!(router.forward().await, Err(RouterError::History(_))));
    }

    #[test]
    fn test_routes_lookup() {
        let router = router();
        assert_eq!(
            router.routes(Some("page2"), KeyType::Path).into_record().unwrap().path(),
            "/page2"
        );
        assert!(router.routes(Some("nope"), KeyType::Path).into_record().is_none());
        assert_eq!(router.routes(None, KeyType::List).into_list().unwrap().len(), 4);
        assert_eq!(router.routes(None, KeyType::Name).into_map().unwrap().len(), 3);
        assert_eq!(router.routes(None, KeyType::Path).into_map().unwrap().len(), 4);
    }

    #[test]
    fn test_reverse() {
        let router = router();
        let mut params = Params::new();
        params.insert("id".into(), ParamValue::Str("ada".into()));
        assert_eq!(router.reverse("user", &params).unwrap(), "/users/ada");
        assert!(router.reverse("missing", &params).is_err());
    }

    #[test]
    fn test_invalid_origin() {
        let settings = RouterSettings {
            origin: "nope".into(),
            ..RouterSettings::default()
        };
        assert!(matches!(
            Router::builder().settings(settings).build(),
            Err(RouterError::ConfigurationError(_))
        ));
    }
}
