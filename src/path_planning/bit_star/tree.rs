//! Vertex/edge store for the growing BIT* tree and its sample pool
//!
//! The tree is an undirected graph over grid cell ids: adjacency lists per
//! vertex plus a deduplicated set of unordered edges. The sample pool holds
//! candidate configurations that have been drawn but not yet promoted into
//! the tree. Growth is monotonic: once committed, no vertex or edge is ever
//! removed.

use std::collections::{HashMap, HashSet};

use crate::common::Point2D;
use super::grid_index::NodeId;

#[derive(Debug, Default)]
pub struct Tree {
    vertices: HashMap<NodeId, Vec<NodeId>>,
    edges: HashSet<(NodeId, NodeId)>,
    samples: HashMap<NodeId, Point2D>,
}

fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex with an empty adjacency list if absent.
    /// Idempotent on the id: distinct points that quantize to the same
    /// cell silently merge.
    pub fn add_vertex(&mut self, id: NodeId) {
        self.vertices.entry(id).or_default();
    }

    /// Register the unordered edge (a, b) once. A duplicate insert is
    /// rejected against the edge set and returns false without touching
    /// the adjacency lists.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.edges.insert(edge_key(a, b)) {
            return false;
        }
        self.vertices.entry(a).or_default().push(b);
        self.vertices.entry(b).or_default().push(a);
        true
    }

    pub fn contains_vertex(&self, id: NodeId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&edge_key(a, b))
    }

    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.vertices.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    /// Deposit a drawn sample into the pool; the last writer wins on a
    /// cell id collision
    pub fn add_sample(&mut self, id: NodeId, point: Point2D) {
        self.samples.insert(id, point);
    }

    /// Remove a sample on promotion into the tree
    pub fn remove_sample(&mut self, id: NodeId) -> Option<Point2D> {
        self.samples.remove(&id)
    }

    pub fn contains_sample(&self, id: NodeId) -> bool {
        self.samples.contains_key(&id)
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.samples.keys().copied()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut tree = Tree::new();
        tree.add_vertex(42);
        tree.add_vertex(42);
        assert_eq!(tree.vertex_count(), 1);
        assert!(tree.neighbors(42).is_empty());
    }

    #[test]
    fn test_add_edge_registers_both_directions() {
        let mut tree = Tree::new();
        tree.add_vertex(1);
        tree.add_vertex(2);
        assert!(tree.add_edge(1, 2));
        assert_eq!(tree.neighbors(1), &[2]);
        assert_eq!(tree.neighbors(2), &[1]);
        assert!(tree.has_edge(2, 1));
    }

    #[test]
    fn test_duplicate_edge_is_rejected() {
        // Set semantics on the unordered pair, regardless of direction
        let mut tree = Tree::new();
        assert!(tree.add_edge(1, 2));
        assert!(!tree.add_edge(1, 2));
        assert!(!tree.add_edge(2, 1));
        assert_eq!(tree.edge_count(), 1);
        assert_eq!(tree.neighbors(1).len(), 1);
    }

    #[test]
    fn test_sample_pool_last_writer_wins() {
        let mut tree = Tree::new();
        tree.add_sample(7, Point2D::new(1.0, 1.0));
        tree.add_sample(7, Point2D::new(1.02, 0.98));
        assert_eq!(tree.sample_count(), 1);
        let taken = tree.remove_sample(7).unwrap();
        assert!((taken.x - 1.02).abs() < 1e-12);
        assert!(tree.remove_sample(7).is_none());
    }
}
