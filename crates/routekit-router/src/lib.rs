//! # routekit-router
//!
//! Client-side routing for routekit: location parsing, route registration and
//! matching, the navigation hook pipeline, and the [`Router`] facade that ties
//! them to a [`history::History`].

pub mod history;
pub mod location;
pub mod navigation;
pub mod router;
pub mod routes;

pub use history::{History, HistoryState, MemoryHistory};
pub use location::{Location, LocationContext, LocationSpec, Query};
pub use navigation::{NavigationController, NavigationKind};
pub use router::{KeyType, NavigationTarget, Router, RouterBuilder, Routes};
pub use routes::{Handler, Next, ParamValue, Params, Route, RouteSpec};
