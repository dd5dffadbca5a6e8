//! Form value map.
//!
//! A [`ValueMap`] mirrors the schema: one entry per field descriptor at every
//! level, in schema order. Sections hold their nested map behind an `Arc` so
//! an edit can rebuild the maps along one path and share every other branch
//! with the previous map.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::FieldPath;

/// A single entry of a value map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, email, select and unrecognized fields.
    Text(String),
    /// Checkbox fields.
    Checked(bool),
    Section(Arc<ValueMap>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_checked(&self) -> Option<bool> {
        match self {
            FieldValue::Checked(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Arc<ValueMap>> {
        match self {
            FieldValue::Section(map) => Some(map),
            _ => None,
        }
    }
}

/// Insertion-ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap {
    entries: IndexMap<String, FieldValue>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    /// Insert or replace a value. Replacing keeps the key's position.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.entries.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The nested map at `path`, or `None` if any segment is not a section.
    pub fn section(&self, path: &FieldPath) -> Option<&ValueMap> {
        let mut map = self;
        for segment in path.as_slice() {
            map = map.get(segment)?.as_section()?;
        }
        Some(map)
    }

    /// The value of `name` inside the section at `path`.
    pub fn lookup(&self, path: &FieldPath, name: &str) -> Option<&FieldValue> {
        self.section(path)?.get(name)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> String {
        // Only strings, bools and string-keyed maps: serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl FromIterator<(String, FieldValue)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ValueMap {
        let mut inner = ValueMap::new();
        inner.insert("x", FieldValue::Checked(false));
        let mut map = ValueMap::new();
        map.insert("a", FieldValue::Text("hi".into()));
        map.insert("s", FieldValue::Section(Arc::new(inner)));
        map
    }

    #[test]
    fn lookup_through_sections() {
        let map = sample();
        assert_eq!(
            map.lookup(&FieldPath::from_slice(&["s"]), "x"),
            Some(&FieldValue::Checked(false))
        );
        assert_eq!(map.lookup(&FieldPath::from_slice(&["a"]), "x"), None);
        assert_eq!(map.lookup(&FieldPath::root(), "missing"), None);
    }

    #[test]
    fn pretty_json_keeps_schema_order() {
        let json = sample().to_pretty_json();
        assert_eq!(
            json,
            "{\n  \"a\": \"hi\",\n  \"s\": {\n    \"x\": false\n  }\n}"
        );
    }

    #[test]
    fn deserializes_nested_json() {
        let map: ValueMap = serde_json::from_str(r#"{"a":"hi","s":{"x":false}}"#).unwrap();
        assert_eq!(map, sample());
    }

    #[test]
    fn insert_replacing_keeps_position() {
        let mut map = sample();
        map.insert("a", FieldValue::Text("bye".into()));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "s"]);
    }
}
