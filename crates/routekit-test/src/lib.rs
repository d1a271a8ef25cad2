//! # routekit-test
//!
//! Testing utilities for routekit. Provides [`call_log::CallLog`] for
//! asserting the order in which hooks fire and [`harness::TestRouter`], a
//! router on an in-memory history with address-bar helpers.
//!
//! The end-to-end tests for the router live in this crate's `tests/`
//! directory.

pub mod call_log;
pub mod harness;

pub use call_log::CallLog;
pub use harness::TestRouter;
