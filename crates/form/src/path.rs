use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered section names from the schema root to a field's parent.
///
/// Empty for top-level fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(pub Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn from_slice(parts: &[&str]) -> Self {
        FieldPath(parts.iter().map(|s| s.to_string()).collect())
    }

    /// A new path one level deeper.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push(name);
        next
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.0.push(part.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_does_not_touch_parent() {
        let parent = FieldPath::from_slice(&["a"]);
        let child = parent.child("b");
        assert_eq!(parent.depth(), 1);
        assert_eq!(child, FieldPath::from_slice(&["a", "b"]));
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(FieldPath::root().to_string(), "<root>");
        assert_eq!(FieldPath::from_slice(&["a", "b"]).to_string(), "a.b");
    }
}
