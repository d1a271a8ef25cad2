//! # routekit
//!
//! A client-side router: path patterns, nested routes, and an async
//! before/after hook pipeline over a browser-style history.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. You can depend on `routekit` to get everything, or depend on
//! individual crates for finer-grained control.
//!
//! ```
//! use routekit::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let settings = RouterSettings::default();
//! routekit::core::logging::setup_logging(&settings);
//!
//! let mut router = Router::builder().settings(settings).build()?;
//! router.map(vec![RouteSpec::new("/blog/:id").name("post")])?;
//!
//! let route = router.push("/blog/5").await?;
//! assert_eq!(route.params["id"], ParamValue::Int(5));
//! # Ok::<(), RouterError>(())
//! # }).unwrap();
//! ```

/// Error type, settings, settings loaders, and logging setup.
pub use routekit_core as core;

/// Location parsing, route matching, history, and the router facade.
pub use routekit_router as router;

/// Call logs and a test router harness.
#[cfg(feature = "testing")]
pub use routekit_test as test;

/// The types most applications need.
pub mod prelude {
    pub use routekit_core::{RouterError, RouterResult, RouterSettings};
    pub use routekit_router::{
        Handler, History, KeyType, Location, LocationSpec, MemoryHistory, NavigationTarget,
        Next, ParamValue, Params, Route, RouteSpec, Router, RouterBuilder,
    };
}
