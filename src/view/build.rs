use crate::core::path::NodePath;
use crate::core::value::JsonValue;
use crate::view::node::{DisplayMode, RenderNode, container_summary};

/// Builds the flat, depth-annotated preorder row list for a document. Every
/// node is present whether or not an ancestor is collapsed; visibility is a
/// separate question answered by `visible_rows`.
///
/// Defaults only: the root starts expanded, every other container collapsed.
/// Preserved expansion state is reapplied afterwards by `state::restore`.
pub fn build_nodes(document: &JsonValue, mode: DisplayMode) -> Vec<RenderNode> {
    let mut out = Vec::new();
    push_node(&mut out, document, mode, NodePath::root(), None, 0);
    out
}

fn push_node(
    out: &mut Vec<RenderNode>,
    value: &JsonValue,
    mode: DisplayMode,
    path: NodePath,
    label: Option<String>,
    depth: usize,
) {
    let container = value.is_container();
    let value_text = if container {
        container_summary(value, mode)
    } else {
        value.leaf_text().unwrap_or_default()
    };
    out.push(RenderNode {
        path: path.clone(),
        depth,
        label,
        kind: value.kind(),
        child_count: value.child_count(),
        expanded: container && path.is_empty(),
        matched: false,
        value_text,
    });

    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                push_node(
                    out,
                    child,
                    mode,
                    path.child_key(key.clone()),
                    Some(key.clone()),
                    depth + 1,
                );
            }
        }
        JsonValue::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                // The position already orders array items; annotated mode
                // drops the index label in favor of a positional marker.
                let label = match mode {
                    DisplayMode::Compact => Some(index.to_string()),
                    DisplayMode::Annotated => None,
                };
                push_node(out, child, mode, path.child_index(index), label, depth + 1);
            }
        }
        _ => {}
    }
}

/// Row indices not hidden inside a collapsed ancestor, in display order.
pub fn visible_rows(nodes: &[RenderNode]) -> Vec<usize> {
    let mut visible = Vec::new();
    let mut expand_stack: Vec<bool> = Vec::new();
    let mut collapsed_ancestors = 0usize;

    for (idx, node) in nodes.iter().enumerate() {
        while expand_stack.len() > node.depth {
            if let Some(expanded) = expand_stack.pop()
                && !expanded
            {
                collapsed_ancestors = collapsed_ancestors.saturating_sub(1);
            }
        }

        if collapsed_ancestors == 0 {
            visible.push(idx);
        }

        let expanded = node.is_container() && node.expanded;
        expand_stack.push(expanded);
        if !expanded {
            collapsed_ancestors += 1;
        }
    }

    visible
}

/// For each row, the row index of its parent (`None` for the root).
pub fn parent_rows(nodes: &[RenderNode]) -> Vec<Option<usize>> {
    let mut parents = Vec::with_capacity(nodes.len());
    let mut stack = Vec::<usize>::new();
    for (idx, node) in nodes.iter().enumerate() {
        stack.truncate(node.depth);
        parents.push(stack.last().copied());
        stack.push(idx);
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::{build_nodes, parent_rows, visible_rows};
    use crate::core::value::{JsonValue, ValueKind};
    use crate::view::node::DisplayMode;

    fn sample() -> JsonValue {
        JsonValue::parse(r#"{"a": 1, "b": {"c": 2}, "items": ["x", "y"]}"#)
            .expect("valid document")
    }

    #[test]
    fn preorder_with_declaration_order() {
        let nodes = build_nodes(&sample(), DisplayMode::Compact);
        let labels: Vec<Option<&str>> = nodes.iter().map(|n| n.label.as_deref()).collect();
        assert_eq!(
            labels,
            [
                None,
                Some("a"),
                Some("b"),
                Some("c"),
                Some("items"),
                Some("0"),
                Some("1")
            ]
        );
        assert_eq!(nodes[0].kind, ValueKind::Object);
        assert_eq!(nodes[1].kind, ValueKind::Number);
        assert_eq!(nodes[3].kind, ValueKind::Number);
        assert_eq!(nodes[5].kind, ValueKind::String);
    }

    #[test]
    fn only_the_root_starts_expanded() {
        let nodes = build_nodes(&sample(), DisplayMode::Compact);
        for node in &nodes {
            let should_expand = node.path.is_empty();
            assert_eq!(node.expanded, should_expand, "path {}", node.path);
        }
        // Collapsed containers hide their subtrees.
        assert_eq!(visible_rows(&nodes), [0, 1, 2, 4]);
    }

    #[test]
    fn annotated_mode_drops_array_index_labels() {
        let nodes = build_nodes(&sample(), DisplayMode::Annotated);
        let items = nodes
            .iter()
            .find(|n| n.label.as_deref() == Some("items"))
            .expect("items row");
        assert_eq!(items.value_text, "[2 items]");
        let first_item = nodes
            .iter()
            .find(|n| n.path.to_string() == "items[0]")
            .expect("items[0] row");
        assert_eq!(first_item.label, None);
    }

    #[test]
    fn parent_rows_follow_depth() {
        let nodes = build_nodes(&sample(), DisplayMode::Compact);
        let parents = parent_rows(&nodes);
        assert_eq!(parents[0], None);
        assert_eq!(parents[1], Some(0));
        assert_eq!(parents[3], Some(2));
        assert_eq!(parents[5], Some(4));
    }

    #[test]
    fn expanding_a_container_reveals_its_children() {
        let mut nodes = build_nodes(&sample(), DisplayMode::Compact);
        let b = nodes
            .iter()
            .position(|n| n.label.as_deref() == Some("b"))
            .expect("b row");
        nodes[b].expanded = true;
        assert_eq!(visible_rows(&nodes), [0, 1, 2, 3, 4]);
    }
}
