//! In-memory attributed graph storage
//!
//! Vertices live in an insertion-ordered map; edges live in a two-level
//! adjacency map (source -> target -> attributes) with a reverse index so that
//! incoming lookups do not need a full adjacency scan. Undirected graphs store
//! every logical edge mirrored in both directions with identical attributes.

use super::edge::Edge;
use super::node::Node;
use super::property::AttributeMap;
use super::types::VertexId;
use crate::filter::{Filter, FilterPipeline};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Attribute '{0}' is reserved")]
    ReservedAttribute(String),

    #[error("Unsupported value for attribute '{key}': {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Vertex {0} already exists")]
    VertexAlreadyExists(VertexId),

    #[error("Invalid edge: source vertex {0} does not exist")]
    InvalidEdgeSource(VertexId),

    #[error("Invalid edge: target vertex {0} does not exist")]
    InvalidEdgeTarget(VertexId),

    #[error("Edge {0} -> {1} not found")]
    EdgeNotFound(VertexId, VertexId),

    #[error("Vertex {0} has no outgoing edges")]
    NoOutgoingEdges(VertexId),

    #[error("Filter index {index} out of range ({len} filters)")]
    FilterIndexOutOfRange { index: usize, len: usize },
}

/// Coarse classification of [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Range,
}

impl GraphError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GraphError::ReservedAttribute(_) | GraphError::UnsupportedValue { .. } => {
                ErrorCategory::Validation
            }
            GraphError::VertexNotFound(_)
            | GraphError::InvalidEdgeSource(_)
            | GraphError::InvalidEdgeTarget(_)
            | GraphError::EdgeNotFound(_, _)
            | GraphError::NoOutgoingEdges(_) => ErrorCategory::NotFound,
            GraphError::VertexAlreadyExists(_) => ErrorCategory::Conflict,
            GraphError::FilterIndexOutOfRange { .. } => ErrorCategory::Range,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Serializable vertex/link listing of a graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<Map<String, Value>>,
    pub links: Vec<Edge>,
}

/// Attributed graph store
///
/// - vertices: VertexId -> Node (iteration order = insertion order)
/// - outgoing: source -> target -> edge attributes
/// - incoming: target -> sources (reverse index of `outgoing`)
/// - filters: ordered predicate pipeline consumed by `rebuild_filtered_graph`
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: IndexMap<VertexId, Node>,
    outgoing: IndexMap<VertexId, IndexMap<VertexId, AttributeMap>>,
    incoming: IndexMap<VertexId, IndexSet<VertexId>>,
    directed: bool,
    filters: FilterPipeline,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(directed: bool) -> Self {
        Graph {
            vertices: IndexMap::new(),
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
            directed,
            filters: FilterPipeline::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Insert a vertex; fails if the id is already taken
    pub fn add_vertex(&mut self, node: Node) -> GraphResult<()> {
        if self.vertices.contains_key(node.id()) {
            return Err(GraphError::VertexAlreadyExists(node.id().clone()));
        }
        debug!("Adding vertex {}", node.id());
        self.vertices.insert(node.id().clone(), node);
        Ok(())
    }

    /// Insert an empty vertex under the smallest positive integer id not in use
    pub fn create_vertex(&mut self) -> Node {
        let mut candidate = 1u64;
        while self.vertices.contains_key(candidate.to_string().as_str()) {
            candidate += 1;
        }
        let node = Node::new(candidate.to_string());
        self.vertices.insert(node.id().clone(), node.clone());
        node
    }

    /// Replace the full attribute set of an existing vertex.
    ///
    /// This is not a merge: attributes absent from `node` are removed.
    pub fn edit_vertex(&mut self, node: &Node) -> GraphResult<()> {
        let existing = self
            .vertices
            .get_mut(node.id())
            .ok_or_else(|| GraphError::VertexNotFound(node.id().clone()))?;

        existing.clear_attributes();
        for (key, value) in node.attributes() {
            existing.set_attribute(key.clone(), value.clone())?;
        }
        debug!("Edited vertex {} ({} attributes)", node.id(), node.attribute_count());
        Ok(())
    }

    /// Remove a vertex together with every edge it participates in
    pub fn delete_vertex(&mut self, id: &VertexId) -> GraphResult<Node> {
        let node = self
            .vertices
            .shift_remove(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))?;

        if let Some(targets) = self.outgoing.shift_remove(id) {
            for target in targets.keys() {
                if let Some(sources) = self.incoming.get_mut(target) {
                    sources.shift_remove(id);
                }
            }
        }
        if let Some(sources) = self.incoming.shift_remove(id) {
            for source in sources {
                if let Some(targets) = self.outgoing.get_mut(&source) {
                    targets.shift_remove(id);
                }
            }
        }

        debug!("Deleted vertex {}", id);
        Ok(node)
    }

    pub fn get_vertex(&self, id: &VertexId) -> Option<&Node> {
        self.vertices.get(id)
    }

    pub fn has_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Node> {
        self.vertices.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Create an attributed edge between two existing vertices.
    ///
    /// Keep-first: if the edge already exists its attributes are left untouched
    /// and `Ok(false)` is returned. Undirected graphs get the mirrored entry.
    pub fn create_edge(
        &mut self,
        source: &VertexId,
        target: &VertexId,
        attrs: AttributeMap,
    ) -> GraphResult<bool> {
        if !self.has_vertex(source) {
            return Err(GraphError::InvalidEdgeSource(source.clone()));
        }
        if !self.has_vertex(target) {
            return Err(GraphError::InvalidEdgeTarget(target.clone()));
        }

        let inserted = self.insert_edge_if_absent(source, target, attrs.clone());
        if !self.directed && source != target {
            self.insert_edge_if_absent(target, source, attrs);
        }
        debug!("Created edge {} -> {} (new: {})", source, target, inserted);
        Ok(inserted)
    }

    /// Re-target the first outgoing edge of `source` (insertion order) to
    /// `new_target`, merging `attrs` over its previous attributes.
    ///
    /// Returns the previous target together with the resulting edge.
    pub fn edit_edge(
        &mut self,
        source: &VertexId,
        new_target: &VertexId,
        attrs: AttributeMap,
    ) -> GraphResult<(VertexId, Edge)> {
        if !self.has_vertex(source) {
            return Err(GraphError::InvalidEdgeSource(source.clone()));
        }
        if !self.has_vertex(new_target) {
            return Err(GraphError::InvalidEdgeTarget(new_target.clone()));
        }
        let previous_target = self
            .outgoing
            .get(source)
            .and_then(|targets| targets.keys().next().cloned())
            .ok_or_else(|| GraphError::NoOutgoingEdges(source.clone()))?;

        let mut merged = self
            .remove_edge_entry(source, &previous_target)
            .unwrap_or_default();
        merged.extend(attrs);

        if !self.directed {
            self.remove_edge_entry(&previous_target, source);
        }
        self.put_edge_entry(source, new_target, merged.clone());
        if !self.directed && source != new_target {
            self.put_edge_entry(new_target, source, merged.clone());
        }

        debug!(
            "Edited edge {} -> {} (now -> {})",
            source, previous_target, new_target
        );
        Ok((
            previous_target,
            Edge::with_attributes(source.clone(), new_target.clone(), merged),
        ))
    }

    /// Delete an edge; both directions in an undirected graph
    pub fn delete_edge(&mut self, source: &VertexId, target: &VertexId) -> GraphResult<()> {
        if self.remove_edge_entry(source, target).is_none() {
            return Err(GraphError::EdgeNotFound(source.clone(), target.clone()));
        }
        if !self.directed {
            self.remove_edge_entry(target, source);
        }
        debug!("Deleted edge {} -> {}", source, target);
        Ok(())
    }

    /// Attributes of the stored edge `source -> target`
    pub fn edge(&self, source: &VertexId, target: &VertexId) -> Option<&AttributeMap> {
        self.outgoing.get(source).and_then(|targets| targets.get(target))
    }

    pub fn has_edge(&self, source: &VertexId, target: &VertexId) -> bool {
        self.edge(source, target).is_some()
    }

    /// All stored adjacency entries (mirrored entries included)
    pub fn edges(&self) -> Vec<Edge> {
        self.outgoing
            .iter()
            .flat_map(|(source, targets)| {
                targets.iter().map(move |(target, attrs)| {
                    Edge::with_attributes(source.clone(), target.clone(), attrs.clone())
                })
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(|targets| targets.len()).sum()
    }

    /// Returns (outgoing neighbor vertices, incoming neighbor vertices)
    pub fn connected_nodes(&self, id: &VertexId) -> (Vec<&Node>, Vec<&Node>) {
        let outgoing = self
            .outgoing
            .get(id)
            .map(|targets| targets.keys().filter_map(|t| self.vertices.get(t)).collect())
            .unwrap_or_default();
        let incoming = self
            .incoming
            .get(id)
            .map(|sources| sources.iter().filter_map(|s| self.vertices.get(s)).collect())
            .unwrap_or_default();
        (outgoing, incoming)
    }

    /// Deduplicated union of outgoing then incoming neighbor ids
    pub fn neighbor_ids(&self, id: &VertexId) -> IndexSet<&VertexId> {
        let mut neighbors = IndexSet::new();
        if let Some(targets) = self.outgoing.get(id) {
            neighbors.extend(targets.keys());
        }
        if let Some(sources) = self.incoming.get(id) {
            neighbors.extend(sources.iter());
        }
        neighbors
    }

    pub fn has_neighbors(&self, id: &VertexId) -> bool {
        self.outgoing.get(id).is_some_and(|t| !t.is_empty())
            || self.incoming.get(id).is_some_and(|s| !s.is_empty())
    }

    pub fn filters(&self) -> &FilterPipeline {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Remove the filter at `index`; out-of-range leaves the list untouched
    pub fn remove_filter(&mut self, index: usize) -> GraphResult<Filter> {
        self.filters.remove(index)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Derive a new graph holding only the vertices that pass every filter
    pub fn rebuild_filtered_graph(&self) -> Graph {
        self.filters.apply(self)
    }

    /// Vertex and link listing for external consumers
    pub fn graph_data(&self) -> GraphData {
        GraphData {
            nodes: self.vertices.values().map(Node::attributes_with_id).collect(),
            links: self.edges(),
        }
    }

    /// Remove every vertex and edge; directedness and filters are kept
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }

    /// All adjacency entries in insertion order
    pub(crate) fn outgoing_entries(
        &self,
    ) -> impl Iterator<Item = (&VertexId, &IndexMap<VertexId, AttributeMap>)> {
        self.outgoing.iter()
    }

    /// Insert a single adjacency entry unless present (no mirroring)
    pub(crate) fn insert_edge_if_absent(
        &mut self,
        source: &VertexId,
        target: &VertexId,
        attrs: AttributeMap,
    ) -> bool {
        let targets = self.outgoing.entry(source.clone()).or_default();
        if targets.contains_key(target) {
            return false;
        }
        targets.insert(target.clone(), attrs);
        self.incoming
            .entry(target.clone())
            .or_default()
            .insert(source.clone());
        true
    }

    fn put_edge_entry(&mut self, source: &VertexId, target: &VertexId, attrs: AttributeMap) {
        self.outgoing
            .entry(source.clone())
            .or_default()
            .insert(target.clone(), attrs);
        self.incoming
            .entry(target.clone())
            .or_default()
            .insert(source.clone());
    }

    fn remove_edge_entry(&mut self, source: &VertexId, target: &VertexId) -> Option<AttributeMap> {
        let attrs = self.outgoing.get_mut(source)?.shift_remove(target)?;
        if let Some(sources) = self.incoming.get_mut(target) {
            sources.shift_remove(source);
        }
        Some(attrs)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::undirected()
    }
}
