//! Graph Explorer
//!
//! An in-memory attributed graph with two derived views that stay consistent
//! under mutation: a filtered graph produced by an ordered filter pipeline, and
//! a navigable forest (one tree per connected component) whose expansion state
//! survives full rebuilds.
//!
//! # Components
//!
//! - `graph`: vertices, edges, typed attributes, the community export
//! - `filter`: search and comparison predicates, the filter pipeline
//! - `forest`: arena-backed tree view and expansion-path replay
//! - `platform`: mutate, rebuild, notify orchestration; listeners, snapshot
//!   subscribers, renderer binding and the workspace registry
//! - `config`: YAML configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use graph_explorer::{AttributeMap, ComparisonOp, Filter, Node, Platform, VertexId};
//!
//! let mut platform = Platform::default();
//!
//! let mut alice = Node::new("alice");
//! alice.set_attribute("age", 30i64).unwrap();
//! let mut bob = Node::new("bob");
//! bob.set_attribute("age", 12i64).unwrap();
//! platform.add_vertex(alice);
//! platform.add_vertex(bob);
//!
//! let (a, b) = (VertexId::new("alice"), VertexId::new("bob"));
//! assert!(platform.create_edge(&a, &b, AttributeMap::new()));
//! assert_eq!(platform.forest().root_count(), 1);
//!
//! // Hide minors: the filtered graph keeps only alice
//! platform.add_filter(Filter::comparison("age", ComparisonOp::Ge, 18i64));
//! assert_eq!(platform.get_graph_data().nodes.len(), 1);
//! assert_eq!(platform.graph().vertex_count(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod filter;
pub mod forest;
pub mod graph;
pub mod platform;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, PlatformConfig};

pub use graph::{
    AttributeMap, AttributeValue, Edge, ErrorCategory, Graph, GraphData, GraphError, GraphEvent,
    GraphResult, Node, VertexId,
};

pub use filter::{ComparisonOp, Filter, FilterDescriptor, FilterError, FilterPipeline};

pub use forest::{ForestView, TreeId, TreeRecord};

pub use platform::{
    ListenerRegistry, Platform, Renderer, SubscriberHub, TextRenderer, TreeViewPayload,
    UpdateListener, Workspace, WorkspaceError, WorkspaceId, WorkspaceManager, WorkspaceResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
