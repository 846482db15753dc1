//! Graph change events
//!
//! Describes a successful mutation of the base graph so that a bound renderer
//! can patch its view incrementally instead of re-rendering everything.

use super::edge::Edge;
use super::node::Node;
use super::types::VertexId;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeAdded(Node),
    NodeEdited(Node),
    NodeRemoved(Node),
    LinkAdded(Edge),
    LinkEdited {
        source: VertexId,
        previous_target: VertexId,
        edge: Edge,
    },
    LinkRemoved {
        source: VertexId,
        target: VertexId,
    },
    /// Filter list changed; no incremental form exists
    FiltersChanged,
    /// The whole graph was swapped or cleared
    GraphReplaced,
}

impl GraphEvent {
    /// Short operation name used in logs
    pub fn operation(&self) -> &'static str {
        match self {
            GraphEvent::NodeAdded(_) => "add_node",
            GraphEvent::NodeEdited(_) => "edit_node",
            GraphEvent::NodeRemoved(_) => "remove_node",
            GraphEvent::LinkAdded(_) => "add_link",
            GraphEvent::LinkEdited { .. } => "edit_link",
            GraphEvent::LinkRemoved { .. } => "remove_link",
            GraphEvent::FiltersChanged => "filters_changed",
            GraphEvent::GraphReplaced => "graph_replaced",
        }
    }
}
