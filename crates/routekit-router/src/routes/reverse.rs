//! Reverse routing: building a path from a named route.

use std::collections::HashMap;
use std::hash::BuildHasher;

use routekit_core::{RouterError, RouterResult};

use super::map::RouteMap;

/// Generates the path for a named route.
///
/// Each parameter is taken from `kwargs` by key (`"id"`, or `"0"` for the
/// first wildcard), falling back to the next unused positional `args` entry.
///
/// # Errors
///
/// Returns [`RouterError::NotFound`] if no route has that name or a required
/// parameter has no value.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use routekit_router::routes::{reverse, PatternOptions, RouteMap, RouteSpec};
///
/// let mut map = RouteMap::new(PatternOptions::default());
/// map.map_routes(vec![RouteSpec::new("/blog/:year/:slug").name("post")]).unwrap();
///
/// let mut kwargs = HashMap::new();
/// kwargs.insert("slug", "hello");
/// assert_eq!(reverse(&map, "post", &["2024"], &kwargs).unwrap(), "/blog/2024/hello");
/// ```
pub fn reverse<S: BuildHasher>(
    map: &RouteMap,
    name: &str,
    args: &[&str],
    kwargs: &HashMap<&str, &str, S>,
) -> RouterResult<String> {
    let record = map
        .by_name(name)
        .ok_or_else(|| RouterError::NotFound(format!("Reverse for '{name}' not found")))?;

    let mut positional = args.iter();
    record.pattern().to_path(|key| {
        kwargs
            .get(key)
            .or_else(|| positional.next())
            .map(|value| (*value).to_string())
    })
}
