use std::collections::HashSet;

use crate::core::path::NodePath;
use crate::view::build::visible_rows;
use crate::view::node::RenderNode;

/// The set of container paths currently shown expanded. This is the only
/// per-node view state that survives a rebuild; everything else about a row
/// is derived from the document, the display mode, and the defaults (root
/// expanded, other containers collapsed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    paths: HashSet<NodePath>,
}

impl ExpansionState {
    pub fn contains(&self, path: &NodePath) -> bool {
        self.paths.contains(path)
    }

    pub fn insert(&mut self, path: NodePath) {
        self.paths.insert(path);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Collects the paths of expanded containers among mounted rows. Rows hidden
/// inside a collapsed ancestor keep their own `expanded` flag on the node for
/// the lifetime of the current tree, but are not part of the captured set.
pub fn capture(nodes: &[RenderNode]) -> ExpansionState {
    let mut state = ExpansionState::default();
    for idx in visible_rows(nodes) {
        let node = &nodes[idx];
        if node.is_container() && node.expanded {
            state.insert(node.path.clone());
        }
    }
    state
}

/// Forces every container whose path is in `state` into the expanded state.
/// Builder defaults are left in place, so the result is the union of the
/// defaults and the captured set.
pub fn restore(nodes: &mut [RenderNode], state: &ExpansionState) {
    for node in nodes.iter_mut() {
        if node.is_container() && state.contains(&node.path) {
            node.expanded = true;
        }
    }
}

pub fn expand_all(nodes: &mut [RenderNode]) {
    for node in nodes.iter_mut() {
        if node.is_container() {
            node.expanded = true;
        }
    }
}

pub fn collapse_all(nodes: &mut [RenderNode]) {
    for node in nodes.iter_mut() {
        if node.is_container() {
            node.expanded = false;
        }
    }
}
