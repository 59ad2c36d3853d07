//! Per-call set of side-loaded resources.

use std::collections::HashSet;

use crate::document::Node;

/// Resources collected for `included`, deduplicated by `(type, id)`.
///
/// The first insertion for a key wins; later ones are dropped. Resources
/// without an id are never tracked since they cannot be referenced.
#[derive(Debug, Default)]
pub(crate) struct IncludedSet {
    keys: HashSet<(String, String)>,
    nodes: Vec<Node>,
}

impl IncludedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, returning false if it was dropped.
    pub(crate) fn insert(&mut self, node: Node) -> bool {
        let Some((kind, id)) = node.key() else {
            return false;
        };
        if !self.keys.insert((kind.to_string(), id.to_string())) {
            tracing::trace!(kind, id, "resource already included, dropping duplicate");
            return false;
        }
        self.nodes.push(node);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Included resources in first-insertion order.
    pub(crate) fn into_vec(self) -> Vec<Node> {
        self.nodes
    }
}
