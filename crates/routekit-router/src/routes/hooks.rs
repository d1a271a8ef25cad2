//! Callback types used by route records, handlers, and the router.
//!
//! Guards are asynchronous and decide whether a navigation continues. Hooks are
//! synchronous notifications that run after the guards approve and cannot stop
//! the navigation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use routekit_core::RouterError;

use super::route::Route;

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a guard decided about the navigation in progress.
#[derive(Debug, Clone)]
pub enum Next {
    /// Run the next step.
    Continue,
    /// Stop with [`RouterError::Aborted`].
    Abort,
    /// Stop with the given error, delivered verbatim.
    Fail(RouterError),
}

impl Next {
    /// Stops the navigation with a plain message error.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(RouterError::msg(message))
    }

    /// Converts the decision into the error that stops the navigation, if any.
    pub fn into_result(self) -> Result<(), RouterError> {
        match self {
            Self::Continue => Ok(()),
            Self::Abort => Err(RouterError::Aborted),
            Self::Fail(err) => Err(err),
        }
    }
}

impl From<bool> for Next {
    fn from(proceed: bool) -> Self {
        if proceed {
            Self::Continue
        } else {
            Self::Abort
        }
    }
}

impl From<RouterError> for Next {
    fn from(err: RouterError) -> Self {
        Self::Fail(err)
    }
}

/// An asynchronous `(to, from)` guard.
pub type Guard = Arc<dyn Fn(Arc<Route>, Arc<Route>) -> BoxFuture<Next> + Send + Sync>;

/// A synchronous `(to, from)` hook.
pub type Hook = Arc<dyn Fn(&Route, &Route) + Send + Sync>;

/// A callback invoked when a navigation is stopped by a guard.
pub type ErrorCallback = Arc<dyn Fn(&RouterError) + Send + Sync>;

/// Computes the scroll position saved with a new history entry, given
/// `(to, from)`.
pub type ScrollBehavior = Arc<dyn Fn(&Route, &Route) -> Value + Send + Sync>;

/// Boxes an async closure into a [`Guard`].
///
/// # Examples
///
/// ```
/// use routekit_router::routes::{guard, Next};
///
/// let g = guard(|to, _from| async move {
///     if to.path == "/admin" { Next::Abort } else { Next::Continue }
/// });
/// # drop(g);
/// ```
pub fn guard<F, Fut>(f: F) -> Guard
where
    F: Fn(Arc<Route>, Arc<Route>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Next> + Send + 'static,
{
    Arc::new(move |to, from| -> BoxFuture<Next> { Box::pin(f(to, from)) })
}

/// Wraps a closure into a [`Hook`].
pub fn hook<F>(f: F) -> Hook
where
    F: Fn(&Route, &Route) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure into an [`ErrorCallback`].
pub fn error_callback<F>(f: F) -> ErrorCallback
where
    F: Fn(&RouterError) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure into a [`ScrollBehavior`].
pub fn scroll_behavior<F>(f: F) -> ScrollBehavior
where
    F: Fn(&Route, &Route) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_into_result() {
        assert!(Next::Continue.into_result().is_ok());
        assert!(matches!(
            Next::Abort.into_result(),
            Err(RouterError::Aborted)
        ));
        let err = Next::fail("nope").into_result().unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_next_from_bool() {
        assert!(matches!(Next::from(true), Next::Continue));
        assert!(matches!(Next::from(false), Next::Abort));
    }

    #[tokio::test]
    async fn test_guard_boxes_async_closure() {
        let g = guard(|to, _from| async move { Next::from(to.path == "/") });
        let start = Arc::new(Route::start());
        let decision = g(Arc::clone(&start), start).await;
        assert!(matches!(decision, Next::Continue));
    }
}
