//! Route registration and matching.
//!
//! - [`pattern`] compiles route paths into matchers.
//! - [`params`] holds cast parameter values.
//! - [`record`] and [`handler`] describe routes and their callbacks.
//! - [`map`] stores registered routes in matching order.
//! - [`matcher`] resolves a location to a [`Route`].
//! - [`reverse`](mod@reverse) builds paths from named routes.

pub mod handler;
pub mod hooks;
pub mod map;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod record;
pub mod reverse;
pub mod route;

pub use handler::Handler;
pub use hooks::{
    error_callback, guard, hook, scroll_behavior, BoxFuture, ErrorCallback, Guard, Hook, Next,
    ScrollBehavior,
};
pub use map::RouteMap;
pub use matcher::match_location;
pub use params::{ParamValue, Params};
pub use pattern::{CompiledPattern, KeyName, PatternKey, PatternOptions};
pub use record::{RouteRecord, RouteSpec};
pub use reverse::reverse;
pub use route::Route;
