//! Location parsing.
//!
//! Turns a URL or path string into a [`Location`]: the router-relative path,
//! query, hash, and decoded segments. Relative inputs are resolved against the
//! configured origin root and base path; absolute URLs have the base stripped.
//!
//! # Examples
//!
//! ```
//! use routekit_router::location::LocationContext;
//!
//! let ctx = LocationContext::new("http://localhost", "").unwrap();
//! let loc = ctx.parse("https://www.example.com:9000/scripts?foo=bar&baz=qux#hash").unwrap();
//!
//! assert_eq!(loc.path, "/scripts");
//! assert_eq!(loc.full_path, "/scripts?foo=bar&baz=qux#hash");
//! assert_eq!(loc.query.get("baz"), Some("qux"));
//! assert_eq!(loc.hash, "hash");
//! assert_eq!(loc.segments, vec!["scripts"]);
//! ```

mod query;

pub use query::Query;

use percent_encoding::percent_decode_str;
use url::Url;

use routekit_core::{RouterError, RouterResult, RouterSettings};

/// A parsed location. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The router-relative path, still percent-encoded (e.g. `/path/to/stuff`).
    pub path: String,
    /// Path plus search and hash (e.g. `/path?key=value#hash`).
    pub full_path: String,
    /// The fragment without the leading `#`, or empty.
    pub hash: String,
    /// Decoded query parameters.
    pub query: Query,
    /// Decoded, non-empty path segments in order.
    pub segments: Vec<String>,
    /// The raw query string with its leading `?`, or empty.
    pub search: String,
    /// The absolute URL, including origin and base.
    pub url: String,
}

impl Location {
    /// Returns the segment at `index`, if present.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }
}

/// Origin and base used to resolve and strip location strings.
#[derive(Debug, Clone)]
pub struct LocationContext {
    origin: Url,
    base: String,
}

impl LocationContext {
    /// Creates a context for the given origin (e.g. `https://example.com`) and
    /// base path (e.g. `/app`, or empty).
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::ConfigurationError`] if the origin is not an
    /// absolute URL.
    pub fn new(origin: &str, base: &str) -> RouterResult<Self> {
        let origin = Url::parse(origin).map_err(|e| {
            RouterError::ConfigurationError(format!("Invalid origin '{origin}': {e}"))
        })?;
        if origin.cannot_be_a_base() {
            return Err(RouterError::ConfigurationError(format!(
                "Origin '{origin}' cannot be used as a base URL"
            )));
        }

        let trimmed = base.trim_matches('/');
        let base = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };

        Ok(Self { origin, base })
    }

    /// Creates a context from router settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is invalid.
    pub fn from_settings(settings: &RouterSettings) -> RouterResult<Self> {
        Self::new(&settings.origin, &settings.normalized_base())
    }

    /// Returns the normalized base path (empty when unset).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the origin URL.
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    /// Parses `input` into a [`Location`].
    ///
    /// `input` may be an absolute URL, an absolute path, or a path without a
    /// leading slash. Paths are router-relative: the base is prepended before
    /// resolving against the origin.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidUrl`] if the input cannot be resolved.
    pub fn parse(&self, input: &str) -> RouterResult<Location> {
        let url = self.resolve(input)?;
        Ok(self.location_from_url(&url))
    }

    fn resolve(&self, input: &str) -> RouterResult<Url> {
        match Url::parse(input) {
            Ok(url) if url.cannot_be_a_base() => Err(RouterError::InvalidUrl(format!(
                "'{input}' is not a hierarchical URL"
            ))),
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let relative = format!("{}/{}", self.base, input.trim_start_matches('/'));
                self.origin
                    .join(&relative)
                    .map_err(|e| RouterError::InvalidUrl(format!("'{input}': {e}")))
            }
            Err(e) => Err(RouterError::InvalidUrl(format!("'{input}': {e}"))),
        }
    }

    fn location_from_url(&self, url: &Url) -> Location {
        let path = self.strip_base(url.path());
        let raw_query = url.query().unwrap_or("");
        let search = if raw_query.is_empty() {
            String::new()
        } else {
            format!("?{raw_query}")
        };
        let hash = url.fragment().unwrap_or("").to_string();

        let mut full_path = format!("{path}{search}");
        if !hash.is_empty() {
            full_path.push('#');
            full_path.push_str(&hash);
        }

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
            .collect();

        Location {
            path,
            full_path,
            hash,
            query: Query::parse(raw_query),
            segments,
            search,
            url: url.to_string(),
        }
    }

    fn strip_base(&self, path: &str) -> String {
        if self.base.is_empty() {
            return path.to_string();
        }
        match path.strip_prefix(&self.base) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }
}

/// An object-form navigation target: a path plus optional query and hash.
///
/// # Examples
///
/// ```
/// use routekit_router::location::LocationSpec;
///
/// let spec = LocationSpec::new("page2").query("test", "value").hash("top");
/// assert_eq!(spec.to_url_string(), "page2?test=value#top");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSpec {
    /// The target path.
    pub path: String,
    /// Query parameters to append.
    pub query: Query,
    /// Fragment without the `#`.
    pub hash: Option<String>,
}

impl LocationSpec {
    /// Creates a spec for `path` with no query or hash.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Query::new(),
            hash: None,
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    /// Sets the fragment.
    #[must_use]
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Renders the target as a path string suitable for [`LocationContext::parse`].
    pub fn to_url_string(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query.to_query_string());
        }
        if let Some(hash) = self.hash.as_deref().filter(|h| !h.is_empty()) {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}
