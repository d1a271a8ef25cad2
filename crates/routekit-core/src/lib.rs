//! # routekit-core
//!
//! Core types for the routekit client-side router: the error enum, router
//! settings and their loaders, and tracing setup. This crate has no routing
//! logic of its own and is the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Per-router configuration
//! - [`settings_loader`] - TOML/JSON/env loading for settings
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RouterError, RouterResult, ABORTED_MESSAGE};
pub use settings::RouterSettings;
