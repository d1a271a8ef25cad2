//! Route specifications and registered route records.
//!
//! A [`RouteSpec`] is what callers hand to `map()`. Registration turns each
//! spec (and each of its children) into an immutable [`RouteRecord`] with a
//! compiled pattern and a back-reference to its parent.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};

use serde_json::Value;

use routekit_core::RouterResult;

use super::handler::Handler;
use super::hooks::{guard, hook, Guard, Hook, Next};
use super::pattern::{CompiledPattern, PatternOptions};
use super::route::Route;

/// A route as declared by the application.
///
/// # Examples
///
/// ```
/// use routekit_router::routes::{Next, RouteSpec};
///
/// let spec = RouteSpec::new("/parent")
///     .name("parent")
///     .before(|_to, _from| async { Next::Continue })
///     .init(|to, _from| println!("entered {}", to.path))
///     .child(RouteSpec::new(":id/child").name("child"));
/// # drop(spec);
/// ```
#[derive(Clone, Default)]
pub struct RouteSpec {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) meta: Value,
    pub(crate) before: Option<Guard>,
    pub(crate) init: Option<Hook>,
    pub(crate) update: Option<Hook>,
    pub(crate) after: Option<Hook>,
    pub(crate) unload: Option<Hook>,
    pub(crate) pop: Option<Hook>,
    pub(crate) handlers: Vec<Arc<Handler>>,
    pub(crate) children: Vec<RouteSpec>,
}

impl RouteSpec {
    /// Creates a spec for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the unique route name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches opaque user data, visible on the matched [`Route`].
    #[must_use]
    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    /// Guard run every time the record is matched.
    #[must_use]
    pub fn before<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Route>, Arc<Route>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Next> + Send + 'static,
    {
        self.before = Some(guard(f));
        self
    }

    /// Hook run when the record becomes matched.
    #[must_use]
    pub fn init<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.init = Some(hook(f));
        self
    }

    /// Hook run when the record stays matched across a navigation.
    #[must_use]
    pub fn update<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.update = Some(hook(f));
        self
    }

    /// Hook run after a navigation to this record commits.
    #[must_use]
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.after = Some(hook(f));
        self
    }

    /// Hook run when navigation leaves this record.
    #[must_use]
    pub fn unload<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.unload = Some(hook(f));
        self
    }

    /// Hook run when the record is matched by a back or forward move through
    /// the history, after its `init` or `update`.
    #[must_use]
    pub fn pop<F>(mut self, f: F) -> Self
    where
        F: Fn(&Route, &Route) + Send + Sync + 'static,
    {
        self.pop = Some(hook(f));
        self
    }

    /// Attaches a handler.
    #[must_use]
    pub fn handler(mut self, handler: Arc<Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Attaches several handlers, kept in the given order.
    #[must_use]
    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Arc<Handler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Adds a nested route whose path is joined onto this one.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Adds several nested routes.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the declared (unjoined) path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("handlers", &self.handlers.len())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// A registered route. Immutable once registered.
pub struct RouteRecord {
    path: String,
    name: Option<String>,
    meta: Value,
    pattern: CompiledPattern,
    parent: Option<Weak<RouteRecord>>,
    pub(crate) before: Option<Guard>,
    pub(crate) init: Option<Hook>,
    pub(crate) update: Option<Hook>,
    pub(crate) after: Option<Hook>,
    pub(crate) unload: Option<Hook>,
    pub(crate) pop: Option<Hook>,
    pub(crate) handlers: Vec<Arc<Handler>>,
}

impl RouteRecord {
    /// Builds a record from a spec whose path has already been joined.
    ///
    /// # Errors
    ///
    /// Returns [`routekit_core::RouterError::MalformedPattern`] if `path` does
    /// not compile.
    pub(crate) fn from_spec(
        spec: &RouteSpec,
        path: String,
        parent: Option<&Arc<Self>>,
        options: PatternOptions,
    ) -> RouterResult<Self> {
        let pattern = CompiledPattern::compile(&path, options)?;
        Ok(Self {
            path,
            name: spec.name.clone(),
            meta: spec.meta.clone(),
            pattern,
            parent: parent.map(Arc::downgrade),
            before: spec.before.clone(),
            init: spec.init.clone(),
            update: spec.update.clone(),
            after: spec.after.clone(),
            unload: spec.unload.clone(),
            pop: spec.pop.clone(),
            handlers: spec.handlers.clone(),
        })
    }

    /// Returns the full (joined) path pattern.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the route name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the attached user data.
    pub const fn meta(&self) -> &Value {
        &self.meta
    }

    /// Returns the compiled pattern.
    pub const fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the attached handlers in declaration order.
    pub fn handlers(&self) -> &[Arc<Handler>] {
        &self.handlers
    }

    /// Returns the parent record, if this record is nested and the parent is
    /// still registered.
    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Returns this record and its ancestors, root first.
    pub fn chain(self: &Arc<Self>) -> Vec<Arc<Self>> {
        let mut chain = vec![Arc::clone(self)];
        let mut cursor = self.parent();
        while let Some(record) = cursor {
            cursor = record.parent();
            chain.push(record);
        }
        chain.reverse();
        chain
    }
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("regex", &self.pattern.regex().as_str())
            .field("parent", &self.parent().map(|p| p.path.clone()))
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}
