//! Query string dictionary for parsed locations.
//!
//! [`Query`] keeps every value seen for a key but answers [`Query::get`] with
//! the last one, so `?a=1&a=2` reads as `a = "2"`.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

/// A last-value-wins dictionary of query parameters.
///
/// Keys keep the order in which they first appeared.
///
/// # Examples
///
/// ```
/// use routekit_router::location::Query;
///
/// let q = Query::parse("color=red&color=blue&size=large");
/// assert_eq!(q.get("color"), Some("blue"));
/// assert_eq!(q.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
/// assert_eq!(q.keys().collect::<Vec<_>>(), vec!["color", "size"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    values: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (without the leading `?`).
    ///
    /// Keys and values are percent-decoded and `+` is read as a space.
    /// Pairs without `=` get an empty value; empty pairs are skipped.
    pub fn parse(query_string: &str) -> Self {
        let mut query = Self::new();
        let query_string = query_string.strip_prefix('?').unwrap_or(query_string);

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));

            query.append(decode_component(key), decode_component(value));
        }

        query
    }

    /// Appends a value to the list for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.entry(key).or_default().push(value.into());
    }

    /// Returns the last value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value for `key`, in order of appearance.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.values.get(key)
    }

    /// Returns `true` if `key` appeared at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterates over `(key, last value)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.as_str(), value)))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serializes every value back into an encoded query string (no `?`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for key in &self.order {
            if let Some(values) = self.values.get(key) {
                for value in values {
                    serializer.append_pair(key, value);
                }
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.append(key, value);
        }
        query
    }
}

/// Percent-decodes one query component, reading `+` as a space.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
