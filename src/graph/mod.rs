//! Attributed graph store
//!
//! This module implements the data model shared by every derived view:
//! - Vertices with an immutable id and a typed attribute map
//! - Directed or undirected (mirrored) attributed edges
//! - An ordered filter list attached to the graph

pub mod edge;
pub mod event;
pub mod export;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use event::GraphEvent;
pub use export::{Community, CommunityDocument};
pub use node::{Node, ID_KEY};
pub use property::{AttributeMap, AttributeValue};
pub use store::{ErrorCategory, Graph, GraphData, GraphError, GraphResult};
pub use types::VertexId;
