//! Core error types for routekit.
//!
//! [`RouterError`] covers both registration-time failures (bad patterns,
//! duplicate names) and navigation-time outcomes (aborted or failed guards).
//! A navigation that simply matches nothing is not an error.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// The message carried by [`RouterError::Aborted`].
pub const ABORTED_MESSAGE: &str = "queue stopped prematurely";

/// The primary error type for routekit.
///
/// The enum is `Clone` so the same error can be delivered to every registered
/// error callback and still be returned to the caller of the navigation.
#[derive(Error, Debug, Clone)]
pub enum RouterError {
    // ── Navigation ───────────────────────────────────────────────────

    /// A guard resolved with `Next::Abort`.
    #[error("queue stopped prematurely")]
    Aborted,

    /// A guard resolved with `Next::Fail`; the wrapped error is shown verbatim.
    #[error("{0}")]
    Custom(Arc<dyn StdError + Send + Sync>),

    // ── Registration ─────────────────────────────────────────────────

    /// A route path could not be compiled into a matcher.
    #[error("Malformed route pattern: {0}")]
    MalformedPattern(String),

    /// A new route record reused a name owned by another record.
    #[error("Duplicate route name: {0}")]
    DuplicateRouteName(String),

    // ── Lookup ───────────────────────────────────────────────────────

    /// A navigation target could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A named route or reverse lookup had no match.
    #[error("Not found: {0}")]
    NotFound(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── History ──────────────────────────────────────────────────────

    /// The history capability rejected an operation.
    #[error("History error: {0}")]
    History(String),
}

impl RouterError {
    /// Wraps an arbitrary error as a [`RouterError::Custom`].
    pub fn custom<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(err))
    }

    /// Builds a [`RouterError::Custom`] from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Custom(Arc::new(MessageError(message.into())))
    }

    /// Returns `true` for errors produced by a guard stopping a navigation.
    pub const fn is_navigation_abort(&self) -> bool {
        matches!(self, Self::Aborted | Self::Custom(_))
    }

    /// Returns `true` for errors raised while registering routes.
    pub const fn is_registration_error(&self) -> bool {
        matches!(self, Self::MalformedPattern(_) | Self::DuplicateRouteName(_))
    }
}

/// A string-only error used by [`RouterError::msg`].
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MessageError(pub String);

/// A convenience type alias for `Result<T, RouterError>`.
pub type RouterResult<T> = Result<T, RouterError>;
