//! The route map: records keyed by path and by name, plus the ordered list
//! the matcher walks.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use routekit_core::{RouterError, RouterResult};

use super::pattern::PatternOptions;
use super::record::{RouteRecord, RouteSpec};

/// Path and name given to the not-found record.
pub const NOT_FOUND_PATH: &str = "*";
/// Name given to the not-found record.
pub const NOT_FOUND_NAME: &str = "notFound";

/// Registered routes.
///
/// Every child path sits in [`RouteMap::path_list`] before its parent, so more
/// specific routes are tried first. Re-registering a path keeps the first
/// record.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    path_map: HashMap<String, Arc<RouteRecord>>,
    name_map: HashMap<String, Arc<RouteRecord>>,
    path_list: Vec<String>,
    not_found: Option<Arc<RouteRecord>>,
    options: PatternOptions,
}

impl RouteMap {
    /// Creates an empty map whose patterns compile with `options`.
    pub fn new(options: PatternOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Registers route specs and their children.
    ///
    /// Registration is all-or-nothing: if any spec fails, the map is left as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MalformedPattern`] for a path that does not
    /// compile, or [`RouterError::DuplicateRouteName`] when a new record reuses
    /// a name held by another record.
    pub fn map_routes(&mut self, specs: Vec<RouteSpec>) -> RouterResult<()> {
        let mut staged = self.clone();
        for spec in &specs {
            staged.add_record(spec, None)?;
        }
        *self = staged;
        Ok(())
    }

    fn add_record(&mut self, spec: &RouteSpec, parent: Option<&Arc<RouteRecord>>) -> RouterResult<()> {
        let path = join_path(parent.map(|p| p.path()), spec.path());

        let (record, is_new) = if let Some(existing) = self.path_map.get(&path) {
            debug!(path = %path, "Route already registered, keeping the first record");
            (Arc::clone(existing), false)
        } else {
            if let Some(name) = &spec.name {
                if self.name_map.contains_key(name) {
                    return Err(RouterError::DuplicateRouteName(format!(
                        "'{name}' is already used by route '{}'",
                        self.name_map[name].path()
                    )));
                }
            }
            let record = Arc::new(RouteRecord::from_spec(spec, path.clone(), parent, self.options)?);
            self.path_map.insert(path.clone(), Arc::clone(&record));
            if let Some(name) = record.name() {
                self.name_map.insert(name.to_string(), Arc::clone(&record));
            }
            debug!(path = %path, name = ?record.name(), "Registered route");
            (record, true)
        };

        let appended_from = self.path_list.len();
        for child in &spec.children {
            self.add_record(child, Some(&record))?;
        }

        if is_new {
            self.path_list.push(path);
        } else if let Some(anchor) = self.path_list.iter().position(|p| *p == path) {
            // New children of an existing record go just before it.
            let added = self.path_list.split_off(appended_from);
            let tail = self.path_list.split_off(anchor);
            self.path_list.extend(added);
            self.path_list.extend(tail);
        }
        Ok(())
    }

    /// Installs the fallback record matched when nothing else does.
    ///
    /// The route's path and name are replaced with `*` and `notFound`; its
    /// children are ignored. A second call replaces the first.
    ///
    /// # Errors
    ///
    /// Returns an error if the wildcard pattern cannot be compiled.
    pub fn set_not_found(&mut self, mut spec: RouteSpec) -> RouterResult<()> {
        spec.path = NOT_FOUND_PATH.to_string();
        spec.name = Some(NOT_FOUND_NAME.to_string());
        spec.children.clear();

        let record = RouteRecord::from_spec(&spec, NOT_FOUND_PATH.to_string(), None, self.options)?;
        self.not_found = Some(Arc::new(record));
        debug!("Registered not-found route");
        Ok(())
    }

    /// Removes every record, including the not-found record.
    pub fn reset(&mut self) {
        self.path_map.clear();
        self.name_map.clear();
        self.path_list.clear();
        self.not_found = None;
    }

    /// Looks a record up by path, then by name.
    pub fn get(&self, key: &str) -> Option<Arc<RouteRecord>> {
        self.by_path(key).or_else(|| self.by_name(key))
    }

    /// Looks a record up by its full path.
    pub fn by_path(&self, path: &str) -> Option<Arc<RouteRecord>> {
        self.path_map.get(path).cloned()
    }

    /// Looks a record up by name.
    pub fn by_name(&self, name: &str) -> Option<Arc<RouteRecord>> {
        self.name_map.get(name).cloned()
    }

    /// Returns the path → record map.
    pub const fn path_map(&self) -> &HashMap<String, Arc<RouteRecord>> {
        &self.path_map
    }

    /// Returns the name → record map.
    pub const fn name_map(&self) -> &HashMap<String, Arc<RouteRecord>> {
        &self.name_map
    }

    /// Returns paths in matching order.
    pub fn path_list(&self) -> &[String] {
        &self.path_list
    }

    /// Iterates over records in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteRecord>> {
        self.path_list.iter().filter_map(|path| self.path_map.get(path))
    }

    /// Returns the not-found record, if installed.
    pub const fn not_found(&self) -> Option<&Arc<RouteRecord>> {
        self.not_found.as_ref()
    }

    /// Returns the pattern options used for new registrations.
    pub const fn options(&self) -> PatternOptions {
        self.options
    }

    /// Returns the number of registered paths.
    pub fn len(&self) -> usize {
        self.path_list.len()
    }

    /// Returns `true` if no paths are registered.
    pub fn is_empty(&self) -> bool {
        self.path_list.is_empty()
    }
}

/// Joins a child path onto its parent, or prefixes `/` on a top-level path.
fn join_path(parent: Option<&str>, path: &str) -> String {
    match parent {
        Some(parent) => format!(
            "{}/{}",
            parent.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None if path.starts_with('/') => path.to_string(),
        None => format!("/{path}"),
    }
}
