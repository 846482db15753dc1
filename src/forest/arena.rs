//! Arena storage for forest nodes
//!
//! Tree nodes are addressed by integer handles into a flat vector. Parent and
//! children links are handles, never owning references, so the structure has
//! no reference cycles even though the underlying graph does.

use crate::graph::{Graph, VertexId};
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a tree node (`T1`, `T2`, ...)
///
/// Never reused, so an id handed out by a previous forest build can not
/// resolve to an unrelated node of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl FromStr for TreeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('T').unwrap_or(s);
        digits.parse::<u64>().map(TreeId)
    }
}

impl Serialize for TreeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Index of a node inside a [`TreeArena`]
pub type NodeHandle = usize;

/// A forest node wrapping one vertex
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub tree_id: TreeId,
    pub vertex: VertexId,
    pub parent: Option<NodeHandle>,
    /// `None` until first expansion; `Some(empty)` once resolved with no neighbors
    children: Option<Vec<NodeHandle>>,
    pub expanded: bool,
}

impl TreeNode {
    /// Resolved children (empty when unresolved)
    pub fn children(&self) -> &[NodeHandle] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_resolved(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug, Default)]
pub struct TreeArena {
    nodes: Vec<TreeNode>,
    by_tree_id: FxHashMap<TreeId, NodeHandle>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_tree_id.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a fresh, unresolved node with a new tree id
    pub fn alloc(&mut self, vertex: VertexId, parent: Option<NodeHandle>) -> NodeHandle {
        let handle = self.nodes.len();
        let tree_id = TreeId::next();
        self.nodes.push(TreeNode {
            tree_id,
            vertex,
            parent,
            children: None,
            expanded: false,
        });
        self.by_tree_id.insert(tree_id, handle);
        handle
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&TreeNode> {
        self.nodes.get(handle)
    }

    pub(crate) fn node(&self, handle: NodeHandle) -> &TreeNode {
        &self.nodes[handle]
    }

    pub(crate) fn node_mut(&mut self, handle: NodeHandle) -> &mut TreeNode {
        &mut self.nodes[handle]
    }

    pub fn find(&self, tree_id: TreeId) -> Option<NodeHandle> {
        self.by_tree_id.get(&tree_id).copied()
    }

    /// Compute children once: one new node per distinct neighbor
    /// (outgoing first, then incoming) of the wrapped vertex.
    pub fn resolve_children(&mut self, handle: NodeHandle, graph: &Graph) -> &[NodeHandle] {
        if self.nodes[handle].children.is_none() {
            let neighbors: Vec<VertexId> = graph
                .neighbor_ids(&self.nodes[handle].vertex)
                .into_iter()
                .cloned()
                .collect();
            let children = neighbors
                .into_iter()
                .map(|vertex| self.alloc(vertex, Some(handle)))
                .collect();
            self.nodes[handle].children = Some(children);
        }
        self.nodes[handle].children()
    }

    /// Domain ids from the root down to `handle`
    pub fn id_path(&self, handle: NodeHandle) -> Vec<VertexId> {
        let mut path = Vec::new();
        let mut current = Some(handle);
        while let Some(h) = current {
            let node = &self.nodes[h];
            path.push(node.vertex.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Handles of every resolved descendant of `handle`
    pub fn descendants(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeHandle> = self.nodes[handle].children().to_vec();
        while let Some(h) = stack.pop() {
            found.push(h);
            stack.extend_from_slice(self.nodes[h].children());
        }
        found
    }
}
