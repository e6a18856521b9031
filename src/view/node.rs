use crate::core::path::NodePath;
use crate::core::value::{JsonValue, ValueKind};

/// Container summary style: `Compact` shows braces with an ellipsis,
/// `Annotated` shows a count-of-children summary and drops the index label
/// on array items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Compact,
    Annotated,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Compact => Self::Annotated,
            Self::Annotated => Self::Compact,
        }
    }
}

/// One row of the rendered tree. Render nodes are view artifacts: the whole
/// vector is thrown away and rebuilt whenever the document, display mode, or
/// source changes; only the expansion-state set carries over.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub path: NodePath,
    pub depth: usize,
    /// Key label shown before the value. `None` for the root and for array
    /// items in annotated mode, which get a positional marker instead.
    pub label: Option<String>,
    pub kind: ValueKind,
    pub child_count: usize,
    pub expanded: bool,
    pub matched: bool,
    /// Leaf text or container summary, as displayed.
    pub value_text: String,
}

impl RenderNode {
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }
}

pub fn container_summary(value: &JsonValue, mode: DisplayMode) -> String {
    match (value, mode) {
        (JsonValue::Object(_), DisplayMode::Compact) => "{ … }".to_string(),
        (JsonValue::Array(_), DisplayMode::Compact) => "[ … ]".to_string(),
        (JsonValue::Object(map), DisplayMode::Annotated) => {
            if map.len() == 1 {
                "{1 field}".to_string()
            } else {
                format!("{{{} fields}}", map.len())
            }
        }
        (JsonValue::Array(items), DisplayMode::Annotated) => {
            if items.len() == 1 {
                "[1 item]".to_string()
            } else {
                format!("[{} items]", items.len())
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayMode, container_summary};
    use crate::core::value::JsonValue;

    #[test]
    fn summaries_follow_the_display_mode() {
        let doc = JsonValue::parse(r#"{"a": 1, "b": 2, "c": 3}"#).expect("valid document");
        assert_eq!(container_summary(&doc, DisplayMode::Compact), "{ … }");
        assert_eq!(container_summary(&doc, DisplayMode::Annotated), "{3 fields}");

        let arr = JsonValue::parse("[0]").expect("valid document");
        assert_eq!(container_summary(&arr, DisplayMode::Compact), "[ … ]");
        assert_eq!(container_summary(&arr, DisplayMode::Annotated), "[1 item]");
    }
}
