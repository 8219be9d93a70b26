//! Raw request input.
//!
//! An upstream decoder hands Veritas up to four buckets of raw values. Each
//! parameter declares which bucket it is read from via [`Source`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bucket of raw, decoded request values keyed by name.
pub type RawMap = serde_json::Map<String, serde_json::Value>;

/// The bucket a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The unified bucket (all request parameters merged by the caller).
    #[default]
    Auto,
    /// URL path parameters (e.g., `/users/{id}`).
    Path,
    /// Decoded request body.
    Body,
    /// Query string parameters.
    Query,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Path => write!(f, "path"),
            Self::Body => write!(f, "body"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// How parameter names are treated.
///
/// Lookups are exact under both policies. The `Atom` policy additionally
/// requires every declared name to be a plain identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`), which schema construction checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Names are arbitrary strings.
    #[default]
    String,
    /// Names are identifier-like symbols.
    Atom,
}

impl KeyPolicy {
    /// Returns true if `name` is acceptable under this policy.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            Self::String => true,
            Self::Atom => {
                let mut chars = name.chars();
                matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Atom => write!(f, "atom"),
        }
    }
}

/// The raw input of one validation call.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use veritas_core::{Input, Source};
///
/// let input = Input::new()
///     .with_path(json!({"id": "7"}).as_object().unwrap().clone())
///     .with_query(json!({"page": "2"}).as_object().unwrap().clone());
///
/// assert_eq!(input.fetch(Source::Path, "id"), Some(&json!("7")));
/// assert_eq!(input.fetch(Source::Query, "id"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    auto: RawMap,
    path: RawMap,
    body: RawMap,
    query: RawMap,
    /// Every source reads from `auto` (nested mappings have a single bucket).
    uniform: bool,
}

impl Input {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input whose unified bucket is `map`.
    #[must_use]
    pub fn from_auto(map: RawMap) -> Self {
        Self {
            auto: map,
            ..Self::default()
        }
    }

    /// Creates the input of a nested schema invocation.
    ///
    /// The mapping serves every source, so a nested parameter's declared
    /// source does not change where it is read from.
    #[must_use]
    pub fn nested(map: RawMap) -> Self {
        Self {
            auto: map,
            uniform: true,
            ..Self::default()
        }
    }

    /// Sets the unified bucket.
    #[must_use]
    pub fn with_auto(mut self, map: RawMap) -> Self {
        self.auto = map;
        self
    }

    /// Sets the path bucket.
    #[must_use]
    pub fn with_path(mut self, map: RawMap) -> Self {
        self.path = map;
        self
    }

    /// Sets the body bucket.
    #[must_use]
    pub fn with_body(mut self, map: RawMap) -> Self {
        self.body = map;
        self
    }

    /// Sets the query bucket.
    #[must_use]
    pub fn with_query(mut self, map: RawMap) -> Self {
        self.query = map;
        self
    }

    /// Returns the bucket for a source.
    #[must_use]
    pub fn bucket(&self, source: Source) -> &RawMap {
        if self.uniform {
            return &self.auto;
        }
        match source {
            Source::Auto => &self.auto,
            Source::Path => &self.path,
            Source::Body => &self.body,
            Source::Query => &self.query,
        }
    }

    /// Fetches a raw value by name from a source's bucket.
    #[must_use]
    pub fn fetch(&self, source: Source, name: &str) -> Option<&serde_json::Value> {
        self.bucket(source).get(name)
    }

    /// Returns true if this is a nested invocation's input.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.uniform
    }

    /// Returns true if every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auto.is_empty() && self.path.is_empty() && self.body.is_empty() && self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> RawMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_buckets_are_separate() {
        let input = Input::from_auto(map(json!({"a": 1})))
            .with_body(map(json!({"a": 2})))
            .with_query(map(json!({"b": 3})));

        assert_eq!(input.fetch(Source::Auto, "a"), Some(&json!(1)));
        assert_eq!(input.fetch(Source::Body, "a"), Some(&json!(2)));
        assert_eq!(input.fetch(Source::Query, "b"), Some(&json!(3)));
        assert_eq!(input.fetch(Source::Path, "a"), None);
    }

    #[test]
    fn test_nested_input_serves_every_source() {
        let input = Input::nested(map(json!({"zip": "10115"})));

        assert!(input.is_nested());
        assert_eq!(input.fetch(Source::Body, "zip"), Some(&json!("10115")));
        assert_eq!(input.fetch(Source::Path, "zip"), Some(&json!("10115")));
    }

    #[test]
    fn test_atom_policy_accepts_identifiers_only() {
        assert!(KeyPolicy::Atom.accepts("user_id"));
        assert!(KeyPolicy::Atom.accepts("_private"));
        assert!(!KeyPolicy::Atom.accepts("user-id"));
        assert!(!KeyPolicy::Atom.accepts("1st"));
        assert!(!KeyPolicy::Atom.accepts(""));
        assert!(KeyPolicy::String.accepts("user-id"));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Auto.to_string(), "auto");
        assert_eq!(Source::Path.to_string(), "path");
        assert_eq!(Source::Body.to_string(), "body");
        assert_eq!(Source::Query.to_string(), "query");
    }

    proptest! {
        #[test]
        fn prop_atom_accepts_identifiers(name in "[A-Za-z_][A-Za-z0-9_]{0,15}") {
            prop_assert!(KeyPolicy::Atom.accepts(&name));
        }

        #[test]
        fn prop_atom_rejects_names_with_separators(
            head in "[a-z]{1,8}",
            sep in "[-. /:]",
            tail in "[a-z]{1,8}",
        ) {
            let name = format!("{head}{sep}{tail}");
            prop_assert!(!KeyPolicy::Atom.accepts(&name));
            prop_assert!(KeyPolicy::String.accepts(&name));
        }
    }
}
