//! Typed route parameters.
//!
//! Captured path values are percent-decoded and then cast: `"true"`/`"false"`
//! become booleans, `"null"` becomes [`ParamValue::Null`], integer-looking
//! strings become [`ParamValue::Int`], decimal-looking strings become
//! [`ParamValue::Float`], and everything else stays a string.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Route parameters keyed by name (named captures) or capture index (`"0"`,
/// `"1"`, … for wildcards and unnamed groups).
pub type Params = HashMap<String, ParamValue>;

/// A cast route parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A literal `true` or `false`.
    Bool(bool),
    /// An integer-looking value.
    Int(i64),
    /// A decimal-looking value, or an integer too large for `i64`.
    Float(f64),
    /// Any other value.
    Str(String),
    /// A literal `null`.
    Null,
}

impl ParamValue {
    /// Casts a decoded string into the most specific value.
    ///
    /// # Examples
    ///
    /// ```
    /// use routekit_router::routes::ParamValue;
    ///
    /// assert_eq!(ParamValue::cast("5"), ParamValue::Int(5));
    /// assert_eq!(ParamValue::cast("-2.5"), ParamValue::Float(-2.5));
    /// assert_eq!(ParamValue::cast("true"), ParamValue::Bool(true));
    /// assert_eq!(ParamValue::cast("blog-title"), ParamValue::Str("blog-title".into()));
    /// ```
    pub fn cast(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            "null" => return Self::Null,
            _ => {}
        }

        match classify_number(raw) {
            NumberShape::Integer => raw
                .parse::<i64>()
                .map(Self::Int)
                .or_else(|_| raw.parse::<f64>().map(Self::Float))
                .unwrap_or_else(|_| Self::Str(raw.to_string())),
            NumberShape::Decimal => raw
                .parse::<f64>()
                .map_or_else(|_| Self::Str(raw.to_string()), Self::Float),
            NumberShape::NotNumeric => Self::Str(raw.to_string()),
        }
    }

    /// Returns the string value, if this is a [`ParamValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a [`ParamValue::Int`].
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a float for both [`ParamValue::Int`] and [`ParamValue::Float`].
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a [`ParamValue::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `true` for [`ParamValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

enum NumberShape {
    Integer,
    Decimal,
    NotNumeric,
}

/// Accepts `-?\d+` and `-?\d*\.\d+`.
fn classify_number(raw: &str) -> NumberShape {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() {
        return NumberShape::NotNumeric;
    }

    match digits.split_once('.') {
        None if digits.bytes().all(|b| b.is_ascii_digit()) => NumberShape::Integer,
        Some((whole, frac))
            if !frac.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit()) =>
        {
            NumberShape::Decimal
        }
        _ => NumberShape::NotNumeric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_integers() {
        assert_eq!(ParamValue::cast("5"), ParamValue::Int(5));
        assert_eq!(ParamValue::cast("2017"), ParamValue::Int(2017));
        assert_eq!(ParamValue::cast("-42"), ParamValue::Int(-42));
        assert_eq!(ParamValue::cast("007"), ParamValue::Int(7));
    }

    #[test]
    fn test_cast_huge_integer_becomes_float() {
        let v = ParamValue::cast("99999999999999999999");
        assert!(matches!(v, ParamValue::Float(_)));
    }

    #[test]
    fn test_cast_decimals() {
        assert_eq!(ParamValue::cast("1.5"), ParamValue::Float(1.5));
        assert_eq!(ParamValue::cast(".5"), ParamValue::Float(0.5));
        assert_eq!(ParamValue::cast("-0.25"), ParamValue::Float(-0.25));
    }

    #[test]
    fn test_cast_not_numeric() {
        assert_eq!(ParamValue::cast("1."), ParamValue::Str("1.".into()));
        assert_eq!(ParamValue::cast("1.2.3"), ParamValue::Str("1.2.3".into()));
        assert_eq!(ParamValue::cast("-"), ParamValue::Str("-".into()));
        assert_eq!(ParamValue::cast("12abc"), ParamValue::Str("12abc".into()));
        assert_eq!(ParamValue::cast(""), ParamValue::Str(String::new()));
        assert_eq!(ParamValue::cast("1e5"), ParamValue::Str("1e5".into()));
    }

    #[test]
    fn test_cast_literals() {
        assert_eq!(ParamValue::cast("true"), ParamValue::Bool(true));
        assert_eq!(ParamValue::cast("false"), ParamValue::Bool(false));
        assert_eq!(ParamValue::cast("null"), ParamValue::Null);
        assert_eq!(ParamValue::cast("True"), ParamValue::Str("True".into()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ParamValue::Int(3).as_i64(), Some(3));
        assert_eq!(ParamValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ParamValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(ParamValue::Str("x".into()).as_i64(), None);
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert!(ParamValue::Null.is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::Int(5).to_string(), "5");
        assert_eq!(ParamValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Str("tech".into()).to_string(), "tech");
        assert_eq!(ParamValue::Null.to_string(), "null");
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&ParamValue::Int(5)).unwrap();
        assert_eq!(json, "5");
        let json = serde_json::to_string(&ParamValue::Str("a".into())).unwrap();
        assert_eq!(json, "\"a\"");
    }
}
