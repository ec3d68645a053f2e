//! DOM arena: slotmap-backed node tree with containment queries.

pub mod node;
pub mod tree;

pub use node::{NodeData, NodeId};
pub use tree::Dom;
