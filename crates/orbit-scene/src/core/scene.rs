use crate::api::types::NodeId;
use crate::components::node::{NodeRole, SceneNode};

/// Flat node storage for a mounted scene.
/// Backdrops hold tens of nodes, so lookups are linear scans.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Hand out the next unused node id.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a node. Insertion order is draw order.
    pub fn insert(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneNode> {
        self.nodes.iter_mut()
    }

    pub fn find_by_label(&self, label: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.label.as_deref() == Some(label))
    }

    pub fn focal(&self) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.role == NodeRole::Focal)
    }

    /// Members of orbit ring `ring`, in angle order.
    pub fn ring_members(&self, ring: usize) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(move |n| n.role == NodeRole::OrbitMember { ring })
    }

    /// Position of a node in storage order, which the instance buffer mirrors.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::shape::{MaterialStyle, ShapeKind};
    use glam::Vec3;

    fn node(graph: &mut SceneGraph, role: NodeRole, label: &str) -> NodeId {
        let id = graph.next_id();
        graph.insert(
            SceneNode::new(id, role, Vec3::ZERO, ShapeKind::Sphere, 1.0, MaterialStyle::default()).with_label(label),
        );
        id
    }

    #[test]
    fn ids_are_unique_and_lookup_works() {
        let mut graph = SceneGraph::new();
        let a = node(&mut graph, NodeRole::Focal, "core");
        let b = node(&mut graph, NodeRole::Floating, "rock");
        assert_ne!(a, b);
        assert_eq!(graph.get(b).unwrap().label.as_deref(), Some("rock"));
        assert_eq!(graph.focal().unwrap().id, a);
        assert_eq!(graph.index_of(b), Some(1));
    }

    #[test]
    fn ring_members_filter_by_ring() {
        let mut graph = SceneGraph::new();
        node(&mut graph, NodeRole::OrbitMember { ring: 0 }, "a");
        node(&mut graph, NodeRole::OrbitMember { ring: 1 }, "b");
        node(&mut graph, NodeRole::OrbitMember { ring: 0 }, "c");
        let labels: Vec<_> = graph.ring_members(0).filter_map(|n| n.label.clone()).collect();
        assert_eq!(labels, vec!["a", "c"]);
        assert!(graph.find_by_label("b").is_some());
    }
}
