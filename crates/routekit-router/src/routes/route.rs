//! The resolved route produced by matching a location.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::location::{Location, Query};

use super::handler::{self, Handler};
use super::params::{ParamValue, Params};
use super::record::RouteRecord;

/// The result of matching a [`Location`] against the route map.
///
/// Carries every location field plus the matched records (root first) and
/// the cast parameters. Passed as `to`/`from` to every guard and hook.
#[derive(Clone)]
pub struct Route {
    /// Router-relative path.
    pub path: String,
    /// Path plus search and hash.
    pub full_path: String,
    /// Fragment without `#`.
    pub hash: String,
    /// Decoded query parameters.
    pub query: Query,
    /// Decoded path segments.
    pub segments: Vec<String>,
    /// Raw query string with its `?`, or empty.
    pub search: String,
    /// Absolute URL.
    pub url: String,
    /// Name of the leaf record.
    pub name: Option<String>,
    /// User data of the leaf record.
    pub meta: Value,
    /// Cast path parameters.
    pub params: Params,
    /// Matched records, root first.
    pub matched: Vec<Arc<RouteRecord>>,
    /// Set when nothing matched and no not-found record was installed.
    pub no_match: bool,
    /// Set when the route was produced from the installed not-found record.
    pub not_found: bool,
}

impl Route {
    /// The route the router starts from before its first navigation.
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            full_path: "/".to_string(),
            hash: String::new(),
            query: Query::new(),
            segments: Vec::new(),
            search: String::new(),
            url: String::new(),
            name: None,
            meta: Value::Null,
            params: Params::new(),
            matched: Vec::new(),
            no_match: false,
            not_found: false,
        }
    }

    /// Builds a route for `record` matched against `location`.
    pub(crate) fn for_record(
        location: Location,
        record: &Arc<RouteRecord>,
        params: Params,
        not_found: bool,
    ) -> Self {
        let mut route = Self::from_location(location);
        route.name = record.name().map(str::to_string);
        route.meta = record.meta().clone();
        route.params = params;
        route.matched = record.chain();
        route.not_found = not_found;
        route
    }

    /// Builds the built-in route used when nothing matches.
    pub(crate) fn unmatched(location: Location) -> Self {
        let mut route = Self::from_location(location);
        route.no_match = true;
        route
    }

    fn from_location(location: Location) -> Self {
        let Location {
            path,
            full_path,
            hash,
            query,
            segments,
            search,
            url,
        } = location;

        Self {
            path,
            full_path,
            hash,
            query,
            segments,
            search,
            url,
            ..Self::start()
        }
    }

    /// Returns a cast parameter.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Returns the leaf record, if any.
    pub fn record(&self) -> Option<&Arc<RouteRecord>> {
        self.matched.last()
    }

    /// Returns `true` if `record` is part of this route (by identity).
    pub fn contains(&self, record: &Arc<RouteRecord>) -> bool {
        self.matched.iter().any(|r| Arc::ptr_eq(r, record))
    }

    /// Returns the handlers of every matched record, root first, each handler
    /// listed once.
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        let mut handlers: Vec<Arc<Handler>> = Vec::new();
        for record in &self.matched {
            for h in record.handlers() {
                if !handler::contains(&handlers, h) {
                    handlers.push(Arc::clone(h));
                }
            }
        }
        handlers
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("full_path", &self.full_path)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("meta", &self.meta)
            .field(
                "matched",
                &self.matched.iter().map(|r| r.path()).collect::<Vec<_>>(),
            )
            .field("no_match", &self.no_match)
            .field("not_found", &self.not_found)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationContext;
    use crate::routes::{PatternOptions, RouteSpec};

    #[test]
    fn test_start_route() {
        let start = Route::start();
        assert_eq!(start.path, "/");
        assert_eq!(start.full_path, "/");
        assert!(start.matched.is_empty());
        assert!(!start.no_match);
    }

    #[test]
    fn test_unmatched_keeps_location() {
        let ctx = LocationContext::new("http://localhost", "").unwrap();
        let route = Route::unmatched(ctx.parse("/nowhere?x=1").unwrap());
        assert!(route.no_match);
        assert_eq!(route.path, "/nowhere");
        assert_eq!(route.query.get("x"), Some("1"));
        assert!(route.handlers().is_empty());
    }

    #[test]
    fn test_handlers_deduplicated_root_first() {
        let shared = Handler::new().shared();
        let own = Handler::new().shared();
        let options = PatternOptions::default();

        let parent = Arc::new(
            RouteRecord::from_spec(
                &RouteSpec::new("/p").handler(Arc::clone(&shared)),
                "/p".into(),
                None,
                options,
            )
            .unwrap(),
        );
        let child = Arc::new(
            RouteRecord::from_spec(
                &RouteSpec::new("c").handlers([Arc::clone(&shared), Arc::clone(&own)]),
                "/p/c".into(),
                Some(&parent),
                options,
            )
            .unwrap(),
        );

        let ctx = LocationContext::new("http://localhost", "").unwrap();
        let route = Route::for_record(ctx.parse("/p/c").unwrap(), &child, Params::new(), false);
        let handlers = route.handlers();
        assert_eq!(handlers.len(), 2);
        assert!(Arc::ptr_eq(&handlers[0], &shared));
        assert!(Arc::ptr_eq(&handlers[1], &own));
        assert!(route.contains(&parent));
        assert_eq!(route.record().unwrap().path(), "/p/c");
    }
}
