//! Serialized shape of the forest

use super::arena::TreeId;
use crate::graph::VertexId;
use serde::Serialize;
use serde_json::{Map, Value};

/// One serialized tree node.
///
/// `children` is only populated for expanded nodes; collapsed nodes always
/// carry an empty list, never a null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRecord {
    pub tree_id: TreeId,
    pub node_id: VertexId,
    pub attributes: Map<String, Value>,
    pub is_expanded: bool,
    pub is_expandable: bool,
    pub children: Vec<TreeRecord>,
}

impl TreeRecord {
    /// Depth-first search for the first record wrapping `node_id`
    pub fn find(&self, node_id: &VertexId) -> Option<&TreeRecord> {
        if &self.node_id == node_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_id))
    }
}
