//! Spatial map for pointer hit testing.
//!
//! [`SpatialMap`] keeps node regions in z-order (insertion order) and answers
//! "which node is under this cell". The global event tap uses it to resolve the
//! target of every mouse event.

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::geometry::{Offset, Region};

/// A spatial map that stores node regions and supports hit-testing queries.
///
/// Later entries are considered "in front" of earlier ones (painter's order),
/// so an overlay placed after the content it floats over wins the hit test.
#[derive(Debug, Clone)]
pub struct SpatialMap {
    /// Entries ordered by z-order (last = frontmost).
    entries: Vec<(NodeId, Region)>,
}

impl SpatialMap {
    /// Create an empty spatial map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Place `node` in front of everything already in the map.
    ///
    /// A node that is already present is moved to the front with its new region.
    pub fn push(&mut self, node: NodeId, region: Region) {
        self.remove(node);
        self.entries.push((node, region));
    }

    /// Drop `node` from the map. Returns `true` if it was present.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != node);
        self.entries.len() != before
    }

    /// Return all nodes whose region contains the given point, ordered
    /// front-to-back (frontmost first).
    pub fn hit_test(&self, point: Offset) -> Vec<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, region)| region.contains_point(point))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Return the frontmost node at the given point that still exists in
    /// `dom`, or `None` if there is none.
    ///
    /// Regions can outlive their nodes until the next layout pass; a stale
    /// entry is skipped so the node behind it receives the hit.
    pub fn node_at(&self, point: Offset, dom: &Dom) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, region)| region.contains_point(point))
            .map(|(id, _)| *id)
            .find(|&id| dom.contains(id))
    }

    /// Number of entries in the spatial map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the spatial map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SpatialMap {
    fn default() -> Self {
        Self::new()
    }
}
