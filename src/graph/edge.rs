//! Edge records
//!
//! The store keeps edges inside its adjacency map; `Edge` is the owned view
//! handed out when edges are listed or serialized as links.

use super::property::{AttributeMap, AttributeValue};
use super::types::VertexId;
use serde::Serialize;

/// A directed, attributed edge between two vertices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// Source vertex (edge goes FROM this vertex)
    pub source: VertexId,

    /// Target vertex (edge goes TO this vertex)
    pub target: VertexId,

    /// Attributes associated with this edge
    pub attrs: AttributeMap,
}

impl Edge {
    pub fn new(source: impl Into<VertexId>, target: impl Into<VertexId>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            attrs: AttributeMap::new(),
        }
    }

    pub fn with_attributes(
        source: impl Into<VertexId>,
        target: impl Into<VertexId>,
        attrs: AttributeMap,
    ) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            attrs,
        }
    }

    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attrs.get(key)
    }

    /// Check if this edge connects two vertices (in either direction)
    pub fn connects(&self, a: &VertexId, b: &VertexId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn starts_from(&self, vertex: &VertexId) -> bool {
        &self.source == vertex
    }

    pub fn ends_at(&self, vertex: &VertexId) -> bool {
        &self.target == vertex
    }
}
