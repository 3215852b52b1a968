// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed key-value custom properties attached to scene objects.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed value stored in an object's property bag.
///
/// Serialized untagged, so JSON `true`, `3`, `2.5` and `"oak"` map to
/// `Bool`, `Int`, `Float` and `String` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Ordered property bag keyed by property name.
pub type Properties = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    /// Returns the value as a float when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice when the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

/// Copies every entry of `source` into `target`, overwriting keys that
/// already exist. Keys only present in `target` are kept.
///
/// Returns the number of entries written.
pub fn merge_properties(target: &mut Properties, source: &Properties) -> usize {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
    source.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_and_keeps_extra_keys() {
        let mut target = Properties::new();
        target.insert("category_id".into(), PropertyValue::Int(3));
        target.insert("material".into(), "oak".into());

        let mut source = Properties::new();
        source.insert("category_id".into(), PropertyValue::Int(7));
        source.insert("room".into(), "kitchen".into());

        let written = merge_properties(&mut target, &source);

        assert_eq!(written, 2);
        assert_eq!(target.len(), 3);
        assert_eq!(target.get("category_id"), Some(&PropertyValue::Int(7)));
        assert_eq!(target.get("material"), Some(&PropertyValue::from("oak")));
        assert_eq!(target.get("room"), Some(&PropertyValue::from("kitchen")));
    }

    #[test]
    fn untagged_json_values() {
        let props: Properties =
            serde_json::from_str(r#"{"a": true, "b": 3, "c": 2.5, "d": "x"}"#).unwrap();
        assert_eq!(props["a"], PropertyValue::Bool(true));
        assert_eq!(props["b"], PropertyValue::Int(3));
        assert_eq!(props["c"], PropertyValue::Float(2.5));
        assert_eq!(props["d"], PropertyValue::String("x".into()));
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(PropertyValue::Int(4).as_f64(), Some(4.0));
        assert_eq!(PropertyValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(PropertyValue::Bool(true).as_f64(), None);
        assert_eq!(PropertyValue::from("chair").as_str(), Some("chair"));
    }
}
