use std::fmt;

use crate::core::value::JsonValue;

/// One step from a node to a child: an object member key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside the document, from the root down. Paths are the
/// stable identity of a node across rebuilds, so they are hashable and
/// compared structurally rather than through a string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Walks the path from `root`. `None` as soon as any segment is missing
    /// or addresses into a non-container; never panics.
    pub fn get<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), JsonValue::Object(map)) => map.get(key)?,
                (PathSegment::Index(index), JsonValue::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn get_mut<'a>(&self, root: &'a mut JsonValue) -> Option<&'a mut JsonValue> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), JsonValue::Object(map)) => map.get_mut(key)?,
                (PathSegment::Index(index), JsonValue::Array(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replaces the value addressed by this path in an owned document and
    /// returns the result. An empty path replaces the root wholesale. The
    /// caller passes a copy it owns; the displayed document is never mutated
    /// in place.
    pub fn set(&self, document: JsonValue, new_value: JsonValue) -> JsonValue {
        let Some(parent_path) = self.parent() else {
            return new_value;
        };
        let mut document = document;
        if let Some(parent) = parent_path.get_mut(&mut document) {
            match (self.segments.last(), parent) {
                (Some(PathSegment::Key(key)), JsonValue::Object(map)) => {
                    map.insert(key.clone(), new_value);
                }
                (Some(PathSegment::Index(index)), JsonValue::Array(items)) => {
                    if let Some(slot) = items.get_mut(*index) {
                        *slot = new_value;
                    }
                }
                _ => {}
            }
        }
        document
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if is_identifier(key) {
                        if idx > 0 {
                            f.write_str(".")?;
                        }
                        f.write_str(key)?;
                    } else {
                        f.write_str("[\"")?;
                        f.write_str(key.replace('\\', "\\\\").replace('"', "\\\"").as_str())?;
                        f.write_str("\"]")?;
                    }
                }
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                }
            }
        }
        Ok(())
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::{NodePath, PathSegment};
    use crate::core::value::JsonValue;

    fn sample() -> JsonValue {
        JsonValue::parse(r#"{"a": 1, "b": {"c": 2}, "items": [{"name": "alpha"}, 9]}"#)
            .expect("valid document")
    }

    #[test]
    fn get_walks_keys_and_indexes() {
        let doc = sample();
        let path = NodePath::root().child_key("items").child_index(0).child_key("name");
        assert_eq!(
            path.get(&doc),
            Some(&JsonValue::String("alpha".to_string()))
        );
        assert_eq!(NodePath::root().get(&doc), Some(&doc));
    }

    #[test]
    fn get_returns_none_for_missing_intermediates() {
        let doc = sample();
        assert_eq!(NodePath::root().child_key("missing").child_key("x").get(&doc), None);
        assert_eq!(NodePath::root().child_key("items").child_index(7).get(&doc), None);
        // Indexing into a scalar is absent too, not a panic.
        assert_eq!(NodePath::root().child_key("a").child_index(0).get(&doc), None);
    }

    #[test]
    fn set_on_empty_path_replaces_the_root() {
        let out = NodePath::root().set(sample(), JsonValue::Bool(true));
        assert_eq!(out, JsonValue::Bool(true));
    }

    #[test]
    fn set_replaces_only_the_addressed_leaf() {
        let doc = sample();
        let path = NodePath::root().child_key("b").child_key("c");
        let number = serde_json::Number::from(5);
        let out = path.set(doc.clone(), JsonValue::Number(number.clone()));

        assert_eq!(path.get(&out), Some(&JsonValue::Number(number)));
        // Every sibling is untouched.
        let a = NodePath::root().child_key("a");
        assert_eq!(a.get(&out), a.get(&doc));
        let name = NodePath::root().child_key("items").child_index(0).child_key("name");
        assert_eq!(name.get(&out), name.get(&doc));
    }

    #[test]
    fn set_replaces_array_slots() {
        let path = NodePath::root().child_key("items").child_index(1);
        let out = path.set(sample(), JsonValue::Null);
        assert_eq!(path.get(&out), Some(&JsonValue::Null));
    }

    #[test]
    fn display_renders_dotted_form() {
        let path = NodePath::new(vec![
            PathSegment::Key("items".to_string()),
            PathSegment::Index(2),
            PathSegment::Key("name".to_string()),
            PathSegment::Key("odd key".to_string()),
        ]);
        assert_eq!(path.to_string(), "items[2].name[\"odd key\"]");
        assert_eq!(NodePath::root().to_string(), "$");
    }
}
