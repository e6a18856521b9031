use crate::view::build::parent_rows;
use crate::view::node::RenderNode;

/// The text a row is searched against: its key label plus its displayed
/// value text (for containers that is the current mode's summary).
pub fn search_text(node: &RenderNode) -> String {
    match &node.label {
        Some(label) => format!("{} {}", label, node.value_text),
        None => node.value_text.clone(),
    }
}

/// Marks every row whose text contains `query` (case-insensitive substring)
/// and force-expands the ancestor chain of each match so it is mounted.
/// Previous markers are always cleared first; an empty or whitespace-only
/// query clears markers and changes no expansion state.
pub fn apply_search(nodes: &mut [RenderNode], query: &str) {
    for node in nodes.iter_mut() {
        node.matched = false;
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return;
    }

    let parents = parent_rows(nodes);
    for idx in 0..nodes.len() {
        if !search_text(&nodes[idx]).to_lowercase().contains(&needle) {
            continue;
        }
        nodes[idx].matched = true;
        let mut cursor = parents[idx];
        while let Some(parent) = cursor {
            if nodes[parent].is_container() {
                nodes[parent].expanded = true;
            }
            cursor = parents[parent];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::apply_search;
    use crate::core::value::JsonValue;
    use crate::view::build::{build_nodes, visible_rows};
    use crate::view::node::{DisplayMode, RenderNode};

    fn sample_nodes() -> Vec<RenderNode> {
        let doc = JsonValue::parse(r#"{"items":[{"name":"alpha"},{"name":"gamma"}]}"#)
            .expect("valid document");
        build_nodes(&doc, DisplayMode::Compact)
    }

    fn row_of(nodes: &[RenderNode], path: &str) -> usize {
        nodes
            .iter()
            .position(|n| n.path.to_string() == path)
            .unwrap_or_else(|| panic!("no row for {path}"))
    }

    #[test]
    fn match_expands_ancestors_and_marks_only_the_match() {
        let mut nodes = sample_nodes();
        apply_search(&mut nodes, "gamma");

        let hit = row_of(&nodes, "items[1].name");
        for (idx, node) in nodes.iter().enumerate() {
            assert_eq!(node.matched, idx == hit, "row {}", node.path);
        }
        // The whole ancestor chain of the hit is forced open, previously
        // collapsed or not, so the hit is mounted.
        assert!(nodes[row_of(&nodes, "items")].expanded);
        assert!(nodes[row_of(&nodes, "items[1]")].expanded);
        assert!(visible_rows(&nodes).contains(&hit));
        // The sibling that did not match keeps its own state.
        assert!(!nodes[row_of(&nodes, "items[0]")].expanded);
    }

    #[test]
    fn search_matches_key_labels_too() {
        let mut nodes = sample_nodes();
        apply_search(&mut nodes, "NAME");
        assert!(nodes[row_of(&nodes, "items[0].name")].matched);
        assert!(nodes[row_of(&nodes, "items[1].name")].matched);
    }

    #[test]
    fn rerunning_a_query_is_idempotent() {
        let mut once = sample_nodes();
        apply_search(&mut once, "gamma");
        let mut twice = sample_nodes();
        apply_search(&mut twice, "gamma");
        apply_search(&mut twice, "gamma");
        assert_eq!(once, twice);
    }

    #[test]
    fn new_query_replaces_old_markers() {
        let mut nodes = sample_nodes();
        apply_search(&mut nodes, "gamma");
        apply_search(&mut nodes, "alpha");
        assert!(nodes[row_of(&nodes, "items[0].name")].matched);
        assert!(!nodes[row_of(&nodes, "items[1].name")].matched);
    }

    #[test]
    fn blank_query_clears_markers_without_touching_expansion() {
        let mut nodes = sample_nodes();
        apply_search(&mut nodes, "gamma");
        let expanded_before: Vec<bool> = nodes.iter().map(|n| n.expanded).collect();

        apply_search(&mut nodes, "   ");
        assert!(nodes.iter().all(|n| !n.matched));
        let expanded_after: Vec<bool> = nodes.iter().map(|n| n.expanded).collect();
        assert_eq!(expanded_after, expanded_before);
    }
}
