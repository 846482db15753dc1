//! Forest view of a graph
//!
//! Each connected component becomes a tree rooted at its first vertex. Tree
//! nodes wrap vertices, get fresh [`TreeId`]s on every rebuild and resolve
//! their children only when expanded. Expansion state is kept as id paths so
//! it can be reconciled against the rebuilt forest.

pub mod arena;
pub mod record;
pub mod view;

pub use arena::{NodeHandle, TreeArena, TreeId, TreeNode};
pub use record::TreeRecord;
pub use view::ForestView;
