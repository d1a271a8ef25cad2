//! Logging integration for routekit.
//!
//! The router emits [`tracing`] events while it registers routes and runs
//! navigations. This module installs a subscriber configured from
//! [`RouterSettings`](crate::settings::RouterSettings) and builds the span each
//! navigation runs in.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::settings::RouterSettings;

/// Directive used when `log_level` cannot be parsed.
const FALLBACK_DIRECTIVE: &str = "info";

/// Builds the event filter from `settings.log_level`.
///
/// Accepts anything `EnvFilter` understands ("debug",
/// "routekit_router=trace,warn", ...). An unparsable value falls back to
/// `info`.
pub fn env_filter(settings: &RouterSettings) -> EnvFilter {
    EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Installs the global tracing subscriber for the router.
///
/// In debug mode events are printed in a pretty format with source locations;
/// otherwise each event is one JSON object per line, with the current
/// navigation span attached.
///
/// Returns `false` if a global subscriber was already installed, in which case
/// nothing changes.
///
/// # Examples
///
/// ```
/// use routekit_core::logging::setup_logging;
/// use routekit_core::settings::RouterSettings;
///
/// let settings = RouterSettings {
///     debug: true,
///     log_level: "routekit_router=debug".into(),
///     ..RouterSettings::default()
/// };
/// setup_logging(&settings);
/// // A second subscriber is never installed.
/// assert!(!setup_logging(&settings));
/// ```
pub fn setup_logging(settings: &RouterSettings) -> bool {
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter(settings));

    let installed = if settings.debug {
        builder
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
    } else {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
    };
    installed.is_ok()
}

/// Creates a tracing span for one navigation.
///
/// Every event emitted while guards and lifecycle hooks run is recorded
/// inside this span.
///
/// # Examples
///
/// ```
/// use routekit_core::logging::navigation_span;
///
/// let span = navigation_span("push", "/users/42");
/// let _guard = span.enter();
/// tracing::info!("navigating");
/// ```
pub fn navigation_span(kind: &str, target: &str) -> tracing::Span {
    tracing::info_span!("navigation", kind = kind, target = target)
}
