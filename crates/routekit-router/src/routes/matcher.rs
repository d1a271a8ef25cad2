//! Matching locations against the route map.

use tracing::trace;

use crate::location::Location;

use super::map::RouteMap;
use super::route::Route;

/// Matches `location` against `map`.
///
/// Records are tried in [`RouteMap::path_list`] order and the first match
/// wins. Without a match the installed not-found record is used, or a
/// built-in route with `no_match` set when none is installed.
pub fn match_location(map: &RouteMap, location: Location) -> Route {
    for record in map.iter() {
        if let Some(params) = record.pattern().match_path(&location.path) {
            trace!(path = %location.path, route = %record.path(), "Matched route");
            return Route::for_record(location, record, params, false);
        }
    }

    match map.not_found() {
        Some(record) => {
            trace!(path = %location.path, "Falling back to not-found route");
            let params = record
                .pattern()
                .match_path(&location.path)
                .unwrap_or_default();
            Route::for_record(location, record, params, true)
        }
        None => {
            trace!(path = %location.path, "No route matched");
            Route::unmatched(location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationContext;
    use crate::routes::{ParamValue, PatternOptions, RouteSpec};

    fn ctx() -> LocationContext {
        LocationContext::new("http://localhost", "").unwrap()
    }

    fn map(specs: Vec<RouteSpec>) -> RouteMap {
        let mut map = RouteMap::new(PatternOptions::default());
        map.map_routes(specs).unwrap();
        map
    }

    #[test]
    fn test_nested_match_root_first() {
        let m = map(vec![
            RouteSpec::new("/parent").child(RouteSpec::new(":id/child"))
        ]);
        let route = match_location(&m, ctx().parse("/parent/foo/child").unwrap());
        assert_eq!(route.params["id"], ParamValue::Str("foo".into()));
        assert_eq!(route.matched.len(), 2);
        assert_eq!(route.matched[0].path(), "/parent");
        assert_eq!(route.matched[1].path(), "/parent/:id/child");
    }

    #[test]
    fn test_child_tried_before_wildcard_parent() {
        let m = map(vec![
            RouteSpec::new("/docs/*").name("docs").child(RouteSpec::new("intro").name("intro"))
        ]);
        let route = match_location(&m, ctx().parse("/docs/*/intro").unwrap());
        assert_eq!(route.name.as_deref(), Some("intro"));

        let route = match_location(&m, ctx().parse("/docs/anything/else").unwrap());
        assert_eq!(route.name.as_deref(), Some("docs"));
        assert_eq!(route.params["0"], ParamValue::Str("anything/else".into()));
    }

    #[test]
    fn test_numeric_cast() {
        let m = map(vec![RouteSpec::new("/blog/:id")]);
        let route = match_location(&m, ctx().parse("/blog/5").unwrap());
        assert_eq!(route.params["id"], ParamValue::Int(5));
    }

    #[test]
    fn test_wildcard_capture() {
        let m = map(vec![RouteSpec::new("/test/*")]);
        let route = match_location(&m, ctx().parse("/test/test2/3").unwrap());
        assert_eq!(route.params["0"], ParamValue::Str("test2/3".into()));
    }

    #[test]
    fn test_route_carries_location_and_meta() {
        let m = map(vec![RouteSpec::new("/path/to/:place")
            .name("home")
            .meta(serde_json::json!({"test": "meta"}))]);
        let route = match_location(
            &m,
            ctx()
                .parse("/path/to/stuff?key=value&key2=value2#hash")
                .unwrap(),
        );
        assert_eq!(route.name.as_deref(), Some("home"));
        assert_eq!(route.meta["test"], "meta");
        assert_eq!(route.path, "/path/to/stuff");
        assert_eq!(route.hash, "hash");
        assert_eq!(route.search, "?key=value&key2=value2");
        assert_eq!(route.segments, vec!["path", "to", "stuff"]);
        assert_eq!(route.full_path, "/path/to/stuff?key=value&key2=value2#hash");
        assert_eq!(route.params["place"], ParamValue::Str("stuff".into()));
        assert!(!route.no_match);
        assert!(!route.not_found);
    }

    #[test]
    fn test_not_found_fallback() {
        let mut m = map(vec![RouteSpec::new("/a")]);
        let route = match_location(&m, ctx().parse("/zzz").unwrap());
        assert!(route.no_match);
        assert!(route.matched.is_empty());

        m.set_not_found(RouteSpec::default()).unwrap();
        let route = match_location(&m, ctx().parse("/zzz").unwrap());
        assert!(!route.no_match);
        assert!(route.not_found);
        assert_eq!(route.name.as_deref(), Some("notFound"));
        assert_eq!(route.matched.len(), 1);

        let route = match_location(&m, ctx().parse("/a").unwrap());
        assert!(!route.not_found);
    }
}
