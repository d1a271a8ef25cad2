//! Route path pattern compilation and matching.
//!
//! A route path such as `/blog/:category/:slug` is compiled once, at
//! registration, into a [`CompiledPattern`]: an anchored regex plus the ordered
//! list of keys its captures map to.
//!
//! Supported syntax:
//!
//! | Token            | Matches                                  | Key          |
//! |------------------|------------------------------------------|--------------|
//! | `:name`          | one segment (`[^/]+?`)                   | `name`       |
//! | `:name?`         | an optional segment, with its leading `/`| `name`       |
//! | `:name(regex)`   | `regex`                                  | `name`       |
//! | `(regex)`        | `regex`                                  | next index   |
//! | `*`              | the rest of the path, slashes included   | next index   |
//! | `\x`             | the literal character `x`                | —            |

use std::fmt;
use std::fmt::Write as _;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use routekit_core::{RouterError, RouterResult, RouterSettings};

use super::params::{ParamValue, Params};

/// Characters escaped when a value is substituted into a single segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Like [`SEGMENT`] but keeps `/` so wildcard values can span segments.
const WILDCARD: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const DEFAULT_SEGMENT_PATTERN: &str = "[^/]+?";
const WILDCARD_PATTERN: &str = ".*";

/// Options that affect how a pattern is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Match letter case exactly.
    pub case_sensitive: bool,
    /// Require trailing slashes to match exactly.
    pub strict: bool,
}

impl From<&RouterSettings> for PatternOptions {
    fn from(settings: &RouterSettings) -> Self {
        Self {
            case_sensitive: settings.case_sensitive,
            strict: settings.strict,
        }
    }
}

/// The name a capture is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// A `:name` parameter.
    Named(String),
    /// A wildcard or unnamed group, by position among unnamed captures.
    Index(usize),
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Metadata for one capture, in the order captures appear in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternKey {
    /// Where the captured value is stored in [`Params`].
    pub name: KeyName,
    /// Whether the capture may be absent.
    pub optional: bool,
    /// Whether the capture swallows the rest of the path.
    pub wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Capture {
        key: usize,
        pattern: String,
        prefixed: bool,
    },
}

/// A route path compiled into a matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    keys: Vec<PatternKey>,
    tokens: Vec<Token>,
}

impl CompiledPattern {
    /// Compiles a route path.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MalformedPattern`] for a dangling `:`, an
    /// unbalanced group, a trailing `\`, or a custom group that is not a valid
    /// regex.
    ///
    /// # Examples
    ///
    /// ```
    /// use routekit_router::routes::{CompiledPattern, ParamValue, PatternOptions};
    ///
    /// let pattern = CompiledPattern::compile("/blog/:id", PatternOptions::default()).unwrap();
    /// let params = pattern.match_path("/blog/5").unwrap();
    /// assert_eq!(params["id"], ParamValue::Int(5));
    /// assert!(pattern.match_path("/BLOG/5/").is_some());
    /// ```
    pub fn compile(source: &str, options: PatternOptions) -> RouterResult<Self> {
        let (tokens, keys) = tokenize(source)?;
        let regex_str = build_regex(source, &tokens, &keys, options);
        let regex = Regex::new(&regex_str).map_err(|e| {
            RouterError::MalformedPattern(format!("{source}: invalid regex ({e})"))
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            keys,
            tokens,
        })
    }

    /// Returns the route path this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the compiled regex.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns capture metadata in pattern order.
    pub fn keys(&self) -> &[PatternKey] {
        &self.keys
    }

    /// Returns `true` if the pattern has no captures.
    pub fn is_static(&self) -> bool {
        self.keys.is_empty()
    }

    /// Matches `path` and returns the decoded, cast parameters.
    ///
    /// Optional captures that did not participate are left out of the map.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::new();

        for (index, key) in self.keys.iter().enumerate() {
            if let Some(m) = captures.name(&group_name(index)) {
                let decoded = percent_decode_str(m.as_str()).decode_utf8_lossy();
                params.insert(key.name.to_string(), ParamValue::cast(&decoded));
            }
        }

        Some(params)
    }

    /// Builds a concrete path by substituting values into the pattern.
    ///
    /// `lookup` is asked for each key by its string name (`"id"`, `"0"`, …).
    /// Values are percent-encoded; wildcard values keep their slashes.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NotFound`] if a required key has no value.
    pub fn to_path<F>(&self, mut lookup: F) -> RouterResult<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Capture { key, prefixed, .. } => {
                    let meta = &self.keys[*key];
                    let name = meta.name.to_string();
                    match lookup(&name) {
                        Some(value) => {
                            if *prefixed {
                                out.push('/');
                            }
                            let set = if meta.wildcard { WILDCARD } else { SEGMENT };
                            out.extend(utf8_percent_encode(&value, set));
                        }
                        None if meta.optional => {}
                        None => {
                            return Err(RouterError::NotFound(format!(
                                "No value provided for parameter '{name}' in route '{}'",
                                self.source
                            )));
                        }
                    }
                }
            }
        }

        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

fn group_name(index: usize) -> String {
    format!("k{index}")
}

fn malformed(source: &str, reason: &str) -> RouterError {
    RouterError::MalformedPattern(format!("{source}: {reason}"))
}

/// Splits a route path into literal and capture tokens.
fn tokenize(source: &str) -> RouterResult<(Vec<Token>, Vec<PatternKey>)> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut keys = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let escaped = chars
                    .get(i + 1)
                    .ok_or_else(|| malformed(source, "trailing escape"))?;
                literal.push(*escaped);
                i += 2;
            }
            '*' => {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::Capture {
                    key: keys.len(),
                    pattern: WILDCARD_PATTERN.to_string(),
                    prefixed: false,
                });
                keys.push(PatternKey {
                    name: KeyName::Index(unnamed),
                    optional: false,
                    wildcard: true,
                });
                unnamed += 1;
                i += 1;
            }
            ':' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                if end == start {
                    return Err(malformed(source, "parameter name expected after ':'"));
                }
                let name: String = chars[start..end].iter().collect();
                i = end;

                let mut pattern = DEFAULT_SEGMENT_PATTERN.to_string();
                if chars.get(i) == Some(&'(') {
                    let (group, next) = read_group(source, &chars, i)?;
                    pattern = group;
                    i = next;
                }

                let optional = chars.get(i) == Some(&'?');
                if optional {
                    i += 1;
                }

                push_capture(
                    &mut tokens,
                    &mut keys,
                    &mut literal,
                    KeyName::Named(name),
                    pattern,
                    optional,
                );
            }
            '(' => {
                let (group, next) = read_group(source, &chars, i)?;
                i = next;
                let optional = chars.get(i) == Some(&'?');
                if optional {
                    i += 1;
                }
                push_capture(
                    &mut tokens,
                    &mut keys,
                    &mut literal,
                    KeyName::Index(unnamed),
                    group,
                    optional,
                );
                unnamed += 1;
            }
            ')' => return Err(malformed(source, "unbalanced ')'")),
            c => {
                literal.push(c);
                i += 1;
            }
        }
    }

    flush_literal(&mut literal, &mut tokens);
    Ok((tokens, keys))
}

fn push_capture(
    tokens: &mut Vec<Token>,
    keys: &mut Vec<PatternKey>,
    literal: &mut String,
    name: KeyName,
    pattern: String,
    optional: bool,
) {
    // An optional segment owns the slash in front of it.
    let prefixed = optional && literal.ends_with('/');
    if prefixed {
        literal.pop();
    }
    flush_literal(literal, tokens);

    tokens.push(Token::Capture {
        key: keys.len(),
        pattern,
        prefixed,
    });
    keys.push(PatternKey {
        name,
        optional,
        wildcard: false,
    });
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

/// Reads a balanced `( … )` group starting at `open`; returns its inner text
/// and the index just past the closing paren.
fn read_group(source: &str, chars: &[char], open: usize) -> RouterResult<(String, usize)> {
    let mut depth = 0usize;
    let mut i = open;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let inner: String = chars[open + 1..i].iter().collect();
                    if inner.is_empty() {
                        return Err(malformed(source, "empty group"));
                    }
                    return Ok((inner, i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(malformed(source, "unclosed '('"))
}

fn build_regex(
    source: &str,
    tokens: &[Token],
    keys: &[PatternKey],
    options: PatternOptions,
) -> String {
    let mut regex_str = String::new();
    if !options.case_sensitive {
        regex_str.push_str("(?i)");
    }
    regex_str.push('^');

    let last = tokens.len().saturating_sub(1);
    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                // Without strict mode the trailing slash is handled below.
                let text = if !options.strict && position == last && source.len() > 1 {
                    text.strip_suffix('/').unwrap_or(text)
                } else {
                    text.as_str()
                };
                regex_str.push_str(&regex::escape(text));
            }
            Token::Capture {
                key,
                pattern,
                prefixed,
            } => {
                let group = group_name(*key);
                let optional = keys[*key].optional;
                match (prefixed, optional) {
                    (true, _) => {
                        write!(regex_str, "(?:/(?P<{group}>{pattern}))?").ok();
                    }
                    (false, true) => {
                        write!(regex_str, "(?P<{group}>{pattern})?").ok();
                    }
                    (false, false) => {
                        write!(regex_str, "(?P<{group}>{pattern})").ok();
                    }
                }
            }
        }
    }

    if !options.strict {
        regex_str.push_str("/?");
    }
    regex_str.push('$');
    regex_str
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> CompiledPattern {
        CompiledPattern::compile(source, PatternOptions::default()).unwrap()
    }

    #[test]
    fn test_static_path() {
        let p = compile("/about");
        assert!(p.is_static());
        assert!(p.match_path("/about").is_some());
        assert!(p.match_path("/about/").is_some());
        assert!(p.match_path("/about/more").is_none());
        assert!(p.match_path("/abou").is_none());
    }

    #[test]
    fn test_root_path() {
        let p = compile("/");
        assert!(p.match_path("/").is_some());
        assert!(p.match_path("/x").is_none());
    }

    #[test]
    fn test_named_param() {
        let p = compile("/path/to/:place");
        let params = p.match_path("/path/to/stuff").unwrap();
        assert_eq!(params["place"], ParamValue::Str("stuff".into()));
        assert!(p.match_path("/path/to/stuff/extra").is_none());
        assert!(p.match_path("/path/to/").is_none());
    }

    #[test]
    fn test_multiple_params_are_cast() {
        let p = compile("/blog/:category/:year/:month/:day/:slug");
        let params = p.match_path("/blog/tech/2017/10/5/blog-title").unwrap();
        assert_eq!(params["category"], ParamValue::Str("tech".into()));
        assert_eq!(params["year"], ParamValue::Int(2017));
        assert_eq!(params["month"], ParamValue::Int(10));
        assert_eq!(params["day"], ParamValue::Int(5));
        assert_eq!(params["slug"], ParamValue::Str("blog-title".into()));
    }

    #[test]
    fn test_wildcard() {
        let p = compile("/test/*");
        let params = p.match_path("/test/test2/3").unwrap();
        assert_eq!(params["0"], ParamValue::Str("test2/3".into()));
        assert_eq!(p.keys()[0].name, KeyName::Index(0));
        assert!(p.keys()[0].wildcard);
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        let p = compile("*");
        assert!(p.match_path("/").is_some());
        assert!(p.match_path("/anything/at/all").is_some());
    }

    #[test]
    fn test_case_insensitive_by_default_values_verbatim() {
        let p = compile("/Users/:name");
        let params = p.match_path("/users/MixedCase").unwrap();
        assert_eq!(params["name"], ParamValue::Str("MixedCase".into()));
    }

    #[test]
    fn test_case_sensitive_option() {
        let options = PatternOptions {
            case_sensitive: true,
            strict: false,
        };
        let p = CompiledPattern::compile("/Users", options).unwrap();
        assert!(p.match_path("/Users").is_some());
        assert!(p.match_path("/users").is_none());
    }

    #[test]
    fn test_strict_option() {
        let options = PatternOptions {
            case_sensitive: false,
            strict: true,
        };
        let p = CompiledPattern::compile("/about", options).unwrap();
        assert!(p.match_path("/about").is_some());
        assert!(p.match_path("/about/").is_none());

        let trailing = CompiledPattern::compile("/about/", options).unwrap();
        assert!(trailing.match_path("/about/").is_some());
        assert!(trailing.match_path("/about").is_none());
    }

    #[test]
    fn test_trailing_slash_in_source_is_optional() {
        let p = compile("/about/");
        assert!(p.match_path("/about").is_some());
        assert!(p.match_path("/about/").is_some());
    }

    #[test]
    fn test_optional_param() {
        let p = compile("/posts/:page?");
        assert!(p.match_path("/posts").unwrap().is_empty());
        let params = p.match_path("/posts/3").unwrap();
        assert_eq!(params["page"], ParamValue::Int(3));
        assert!(p.keys()[0].optional);
    }

    #[test]
    fn test_custom_param_regex() {
        let p = compile(r"/items/:id(\d+)");
        assert_eq!(p.match_path("/items/42").unwrap()["id"], ParamValue::Int(42));
        assert!(p.match_path("/items/abc").is_none());
    }

    #[test]
    fn test_unnamed_group() {
        let p = compile(r"/files/(\d+)/*");
        let params = p.match_path("/files/7/a/b.txt").unwrap();
        assert_eq!(params["0"], ParamValue::Int(7));
        assert_eq!(params["1"], ParamValue::Str("a/b.txt".into()));
    }

    #[test]
    fn test_captures_are_decoded() {
        let p = compile("/search/:term");
        let params = p.match_path("/search/hello%20world").unwrap();
        assert_eq!(params["term"], ParamValue::Str("hello world".into()));
    }

    #[test]
    fn test_literal_regex_chars_are_escaped() {
        let p = compile("/file.json");
        assert!(p.match_path("/file.json").is_some());
        assert!(p.match_path("/fileXjson").is_none());

        let escaped = compile(r"/price\:amount");
        assert!(escaped.is_static());
        assert!(escaped.match_path("/price:amount").is_some());
    }

    #[test]
    fn test_malformed_patterns() {
        for bad in ["/users/:", "/a/(", "/a/)", "/a/:id(", "/a/()", r"/a\", "/a/:id([)"] {
            let result = CompiledPattern::compile(bad, PatternOptions::default());
            assert!(
                matches!(result, Err(RouterError::MalformedPattern(_))),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn test_to_path() {
        let p = compile("/blog/:category/:id");
        let path = p
            .to_path(|key| match key {
                "category" => Some("tech news".to_string()),
                "id" => Some("5".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(path, "/blog/tech%20news/5");
    }

    #[test]
    fn test_to_path_optional_and_wildcard() {
        let p = compile("/docs/:lang?/*");
        let path = p
            .to_path(|key| (key == "0").then(|| "guide/intro".to_string()))
            .unwrap();
        assert_eq!(path, "/docs/guide/intro");

        let missing = compile("/users/:id").to_path(|_| None);
        assert!(matches!(missing, Err(RouterError::NotFound(_))));
    }

    #[test]
    fn test_source_accessor() {
        let p = compile("/users/:id");
        assert_eq!(p.source(), "/users/:id");
        assert!(p.regex().as_str().contains("(?P<k0>"));
    }
}
