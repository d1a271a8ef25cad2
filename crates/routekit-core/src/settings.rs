//! Router settings.
//!
//! [`RouterSettings`] holds everything that shapes how URLs are parsed and how
//! route patterns are compiled. Settings are owned by each router instance;
//! there is no process-wide settings object.

use serde::{Deserialize, Serialize};

/// The complete set of router settings.
///
/// # Examples
///
/// ```
/// use routekit_core::settings::RouterSettings;
///
/// let settings = RouterSettings::default();
/// assert_eq!(settings.origin, "http://localhost");
/// assert!(!settings.case_sensitive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Scheme, host, and port that relative paths are resolved against.
    pub origin: String,
    /// Path prefix stripped from every parsed location (e.g. `/app`).
    pub base: String,
    /// Whether route patterns match case-sensitively.
    pub case_sensitive: bool,
    /// When `true`, a trailing slash must match exactly.
    pub strict: bool,
    /// Pretty log output when `true`, JSON otherwise.
    pub debug: bool,
    /// Filter directive for the tracing subscriber.
    pub log_level: String,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            origin: "http://localhost".to_string(),
            base: String::new(),
            case_sensitive: false,
            strict: false,
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

impl RouterSettings {
    /// Returns the base with a leading slash and no trailing slash, or an
    /// empty string when no base is configured.
    pub fn normalized_base(&self) -> String {
        let trimmed = self.base.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = RouterSettings::default();
        assert_eq!(s.origin, "http://localhost");
        assert!(s.base.is_empty());
        assert!(!s.case_sensitive);
        assert!(!s.strict);
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_normalized_base() {
        let mut s = RouterSettings::default();
        assert_eq!(s.normalized_base(), "");

        s.base = "app/".to_string();
        assert_eq!(s.normalized_base(), "/app");

        s.base = "/nested/app".to_string();
        assert_eq!(s.normalized_base(), "/nested/app");

        s.base = "/".to_string();
        assert_eq!(s.normalized_base(), "");
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let s: RouterSettings = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert!(s.strict);
        assert_eq!(s.origin, "http://localhost");
    }
}
