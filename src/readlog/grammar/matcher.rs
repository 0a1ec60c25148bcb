//! Named-Group Pattern Matcher
//!
//! A generic, standalone matcher that turns a text segment into a map of named
//! captures. It knows nothing about reading logs: the column tables in
//! [`columns`](super::columns) give it patterns and field names.
//!
//! ## Example
//!
//! ```text
//! Segment:  "in A Series, #2"
//! Pattern:  "^(?:in\s+)?(?P<series_name>.+?),?\s*#(?P<series_volume>\d+)$"
//! Fields:   { series_name: "A Series", series_volume: "2" }
//! ```
//!
//! Captures that are absent or blank are left out, so a field is either present
//! with content or missing altogether. Field names listed as "flatten" are
//! always stored as lists, even when captured once, so consumers see one shape.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

/// A captured field: one value, or a list for flatten fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

/// Named captures of one segment (or of several merged segments).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a captured value. Flatten fields accumulate into a list, other
    /// fields keep the first value stored.
    pub fn insert(&mut self, name: &str, value: String, flatten: bool) {
        match self.values.get_mut(name) {
            Some(FieldValue::List(list)) => list.push(value),
            Some(FieldValue::Scalar(_)) => {}
            None => {
                let value = if flatten {
                    FieldValue::List(vec![value])
                } else {
                    FieldValue::Scalar(value)
                };
                self.values.insert(name.to_string(), value);
            }
        }
    }

    /// The value of a field; for a list, its first element.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::List(list) => list.first().map(String::as_str),
        }
    }

    /// All values of a field; a scalar is a one-element list.
    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(FieldValue::Scalar(value)) => std::slice::from_ref(value),
            Some(FieldValue::List(list)) => list,
            None => &[],
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge a later segment's fields into this one: lists concatenate,
    /// scalars already present win.
    pub fn merge(&mut self, other: Fields) {
        for (name, value) in other.values {
            match self.values.get_mut(&name) {
                Some(FieldValue::List(list)) => match value {
                    FieldValue::List(more) => list.extend(more),
                    FieldValue::Scalar(one) => list.push(one),
                },
                Some(FieldValue::Scalar(_)) => {}
                None => {
                    self.values.insert(name, value);
                }
            }
        }
    }
}

/// Error type for pattern compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("invalid pattern {name:?}: {message}")]
    InvalidPattern { name: String, message: String },
}

/// A named regex whose named groups become [`Fields`].
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    name: &'static str,
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a matcher from a fully expanded regex pattern.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, MatcherError> {
        let regex = Regex::new(pattern).map_err(|e| MatcherError::InvalidPattern {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { name, regex })
    }

    /// Match the whole pattern against `text`.
    ///
    /// Returns `None` if the pattern does not match, otherwise the non-blank
    /// named captures (possibly none).
    pub fn match_fields(&self, text: &str, flatten: &[&str]) -> Option<Fields> {
        self.match_prefix(text, flatten).map(|(fields, _)| fields)
    }

    /// Like [`match_fields`](Self::match_fields), also returning the byte
    /// offset where the match ends. Patterns that are not anchored at the end
    /// may leave a remainder.
    pub fn match_prefix(&self, text: &str, flatten: &[&str]) -> Option<(Fields, usize)> {
        let caps = self.regex.captures(text)?;
        let end = caps.get(0).map_or(0, |m| m.end());
        let mut fields = Fields::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    fields.insert(name, value.to_string(), flatten.contains(&name));
                }
            }
        }
        Some((fields, end))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
