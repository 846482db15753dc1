//! Filtered graph derivation
//!
//! An ordered list of attribute predicates attached to a graph, and the
//! rebuild that turns it into a derived, non-destructive filtered graph.

pub mod pipeline;
pub mod predicate;

pub use pipeline::FilterPipeline;
pub use predicate::{ComparisonOp, Filter, FilterDescriptor, FilterError};
