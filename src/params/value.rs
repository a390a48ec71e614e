//! Coerced parameter values
//!
//! The UI sends every value as a string; directives need typed values for
//! branching. Coercion is lossy and is applied identically regardless of
//! which directive is being decoded.

use std::collections::BTreeMap;

/// Boolean-typed directive keys, matched against the dotted key
/// (`key` or `key.subkey`).
pub(crate) const BOOLEAN_KEYS: &[&str] = &["search.regex", "searchable", "orderable", "regex"];

/// A decoded directive value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Integer-parseable value
    Int(i64),
    /// Recognized boolean field (`"true"` is true, anything else false)
    Bool(bool),
    /// Everything else, kept verbatim
    Text(String),
    /// Nested entry, one level deep (per-column `search` state)
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Coerce a raw string under the given dotted key.
    ///
    /// Integer parse wins; boolean coercion applies only to the fixed
    /// recognized key set; otherwise the string is kept as-is.
    pub fn coerce(dotted_key: &str, raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return ParamValue::Int(n);
        }
        if BOOLEAN_KEYS.contains(&dotted_key) {
            return ParamValue::Bool(raw == "true");
        }
        ParamValue::Text(raw.to_string())
    }

    /// Integer value, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String slice, if this is `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Nested entry under `key`, if this is a `Map`
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            ParamValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// String form of a scalar value.
    ///
    /// Coercion may have turned an all-digit search term into an `Int`; this
    /// recovers the text the client sent. Maps render empty.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Map(_) => String::new(),
        }
    }
}
