//! Forest view over a graph
//!
//! One tree per connected component (connectivity ignores edge direction),
//! children resolved lazily on expansion. Every rebuild throws the previous
//! arena away, so the user's expansion state is remembered as paths of vertex
//! ids from a root down to each expanded node and replayed after the build.

use super::arena::{NodeHandle, TreeArena, TreeId, TreeNode};
use super::record::TreeRecord;
use crate::graph::{Graph, Node, VertexId, ID_KEY};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ForestView {
    arena: TreeArena,
    roots: Vec<NodeHandle>,
    expanded_paths: IndexSet<Vec<VertexId>>,
}

impl ForestView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest for `graph` with no remembered expansions
    pub fn build(graph: &Graph) -> Self {
        let mut view = Self::new();
        view.rebuild(graph);
        view
    }

    /// Recreate every tree from scratch, then replay remembered expansions.
    ///
    /// Components are discovered in vertex order; the first unvisited vertex
    /// of each becomes its root. The flood fill uses an explicit stack.
    pub fn rebuild(&mut self, graph: &Graph) {
        self.arena.clear();
        self.roots.clear();

        let mut visited: FxHashSet<&VertexId> = FxHashSet::default();
        for vertex in graph.vertex_ids() {
            if visited.contains(vertex) {
                continue;
            }
            self.roots.push(self.arena.alloc(vertex.clone(), None));

            let mut to_visit = vec![vertex];
            while let Some(current) = to_visit.pop() {
                if !visited.insert(current) {
                    continue;
                }
                for neighbor in graph.neighbor_ids(current) {
                    if !visited.contains(neighbor) {
                        to_visit.push(neighbor);
                    }
                }
            }
        }

        self.restore_expansions(graph);
        debug!(
            "Forest rebuilt: {} roots, {} remembered expansions",
            self.roots.len(),
            self.expanded_paths.len()
        );
    }

    fn restore_expansions(&mut self, graph: &Graph) {
        let remembered = std::mem::take(&mut self.expanded_paths);
        for path in remembered {
            if self.replay_path(graph, &path) {
                self.expanded_paths.insert(path);
            } else {
                debug!("Forgetting expansion path {:?}", path);
            }
        }
    }

    /// Walk `path` level by level, expanding each match before descending.
    ///
    /// Fails on the first level without a matching node or on a node that no
    /// longer has any children; levels already expanded stay expanded.
    fn replay_path(&mut self, graph: &Graph, path: &[VertexId]) -> bool {
        let mut level = self.roots.clone();
        for vertex in path {
            let Some(handle) = level
                .iter()
                .copied()
                .find(|&h| &self.arena.node(h).vertex == vertex)
            else {
                return false;
            };
            let children = self.arena.resolve_children(handle, graph).to_vec();
            if children.is_empty() {
                return false;
            }
            self.arena.node_mut(handle).expanded = true;
            level = children;
        }
        !path.is_empty()
    }

    /// Expand the node with `tree_id` and remember its path
    pub fn expand(&mut self, graph: &Graph, tree_id: TreeId) -> bool {
        let Some(handle) = self.arena.find(tree_id) else {
            return false;
        };
        self.arena.resolve_children(handle, graph);
        self.arena.node_mut(handle).expanded = true;
        self.expanded_paths.insert(self.arena.id_path(handle));
        true
    }

    /// Collapse the node with `tree_id`, forgetting its path and every
    /// remembered path beneath it
    pub fn collapse(&mut self, tree_id: TreeId) -> bool {
        let Some(handle) = self.arena.find(tree_id) else {
            return false;
        };
        self.arena.node_mut(handle).expanded = false;
        for descendant in self.arena.descendants(handle) {
            self.arena.node_mut(descendant).expanded = false;
        }

        let prefix = self.arena.id_path(handle);
        self.expanded_paths.retain(|path| !path.starts_with(&prefix));
        true
    }

    /// Reveal `vertex`: find it by searching the forest (resolving children on
    /// the way) and remember every ancestor on the discovered path as expanded.
    pub fn expand_path_to_node(&mut self, graph: &Graph, vertex: &VertexId) -> bool {
        let mut visited: FxHashSet<VertexId> = FxHashSet::default();
        let mut stack: Vec<NodeHandle> = self.roots.iter().rev().copied().collect();
        let mut found = None;

        while let Some(handle) = stack.pop() {
            let current = self.arena.node(handle).vertex.clone();
            if &current == vertex {
                found = Some(handle);
                break;
            }
            if !visited.insert(current) {
                continue;
            }
            let children = self.arena.resolve_children(handle, graph);
            stack.extend(children.iter().rev());
        }

        let Some(handle) = found else {
            return false;
        };
        let path = self.arena.id_path(handle);
        for depth in 1..path.len() {
            self.expanded_paths.insert(path[..depth].to_vec());
        }

        let mut ancestor = self.arena.node(handle).parent;
        while let Some(h) = ancestor {
            self.arena.node_mut(h).expanded = true;
            ancestor = self.arena.node(h).parent;
        }
        true
    }

    /// Forget every remembered expansion (current flags are left alone)
    pub fn forget_expansions(&mut self) {
        self.expanded_paths.clear();
    }

    pub fn roots(&self) -> impl Iterator<Item = &TreeNode> {
        self.roots.iter().map(|&h| self.arena.node(h))
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn node(&self, tree_id: TreeId) -> Option<&TreeNode> {
        self.arena.find(tree_id).and_then(|h| self.arena.get(h))
    }

    /// Tree id of the node reached by following `path` through resolved children
    pub fn find_tree_id(&self, path: &[VertexId]) -> Option<TreeId> {
        let mut level: &[NodeHandle] = &self.roots;
        let mut found = None;
        for vertex in path {
            let handle = level
                .iter()
                .copied()
                .find(|&h| &self.arena.node(h).vertex == vertex)?;
            found = Some(handle);
            level = self.arena.node(handle).children();
        }
        found.map(|h| self.arena.node(h).tree_id)
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &[VertexId]> {
        self.expanded_paths.iter().map(|path| path.as_slice())
    }

    pub fn is_remembered(&self, path: &[VertexId]) -> bool {
        self.expanded_paths.iter().any(|p| p.as_slice() == path)
    }

    /// Nested records, one per root
    pub fn serialize(&self, graph: &Graph) -> Vec<TreeRecord> {
        self.roots.iter().map(|&h| self.record(graph, h)).collect()
    }

    fn record(&self, graph: &Graph, handle: NodeHandle) -> TreeRecord {
        let node = self.arena.node(handle);
        let attributes = graph
            .get_vertex(&node.vertex)
            .map(Node::attributes_with_id)
            .unwrap_or_else(|| {
                let mut only_id = Map::new();
                only_id.insert(ID_KEY.to_string(), Value::String(node.vertex.to_string()));
                only_id
            });
        let children = if node.expanded {
            node.children()
                .iter()
                .map(|&child| self.record(graph, child))
                .collect()
        } else {
            Vec::new()
        };

        TreeRecord {
            tree_id: node.tree_id,
            node_id: node.vertex.clone(),
            attributes,
            is_expanded: node.expanded,
            is_expandable: graph.has_neighbors(&node.vertex),
            children,
        }
    }

    /// Text outline: `+` collapsed but expandable, `-` expanded, blank leaf
    pub fn render_outline(&self, graph: &Graph) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeHandle, usize)> =
            self.roots.iter().rev().map(|&h| (h, 0)).collect();

        while let Some((handle, depth)) = stack.pop() {
            let node = self.arena.node(handle);
            let marker = if node.expanded {
                '-'
            } else if graph.has_neighbors(&node.vertex) {
                '+'
            } else {
                ' '
            };
            let _ = writeln!(
                out,
                "{}{} {} (Node {})",
                "    ".repeat(depth),
                marker,
                node.tree_id,
                node.vertex
            );
            if node.expanded {
                stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        out
    }
}
