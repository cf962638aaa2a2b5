//! Octree node storage
//!
//! Nodes live in an arena owned by [`Octree`](super::Octree) and refer to each
//! other by [`NodeId`]. Nodes are neither `Clone` nor `Copy`; the arena is
//! their single owner and dropping the tree releases every node.

use crate::foundation::collections::{NodeId, ObjectId};
use crate::spatial::AABB;

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Unsubdivided and still allowed to subdivide
    Leaf,
    /// Unsubdivided with no depth budget left; accepts unbounded objects
    TerminalLeaf,
    /// Owns eight children
    Subdivided,
}

/// Single node in the octree hierarchy
#[derive(Debug)]
pub struct OctreeNode {
    /// World-space bounds of this node
    bounds: AABB,

    /// Back-reference for upward traversal, `None` for the root
    parent: Option<NodeId>,

    /// Distance from the root (0 = root)
    level: u32,

    /// Remaining subdivision levels
    depth_budget: u32,

    /// Objects held directly by this node
    objects: Vec<ObjectId>,

    /// Child nodes in octant order, `None` until subdivided
    children: Option<[NodeId; 8]>,
}

impl OctreeNode {
    /// Create a new leaf node
    pub(crate) fn new(bounds: AABB, parent: Option<NodeId>, level: u32, depth_budget: u32) -> Self {
        Self {
            bounds,
            parent,
            level,
            depth_budget,
            objects: Vec::new(),
            children: None,
        }
    }

    /// World-space bounds of this node
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Remaining subdivision levels
    pub fn depth_budget(&self) -> u32 {
        self.depth_budget
    }

    /// Objects held directly by this node
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Child nodes in octant order, if subdivided
    pub fn children(&self) -> Option<&[NodeId; 8]> {
        self.children.as_ref()
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Current lifecycle state
    pub fn state(&self) -> NodeState {
        match (&self.children, self.depth_budget) {
            (Some(_), _) => NodeState::Subdivided,
            (None, 0) => NodeState::TerminalLeaf,
            (None, _) => NodeState::Leaf,
        }
    }

    /// Whether a new object may be appended directly
    pub(crate) fn has_room(&self, capacity: usize) -> bool {
        self.is_leaf() && (self.depth_budget == 0 || self.objects.len() < capacity)
    }

    pub(crate) fn push_object(&mut self, id: ObjectId) {
        self.objects.push(id);
    }

    /// Detach an object; returns false if it was not held here
    pub(crate) fn remove_object(&mut self, id: ObjectId) -> bool {
        match self.objects.iter().position(|&held| held == id) {
            Some(index) => {
                self.objects.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop to a terminal leaf; used when children would get no budget
    pub(crate) fn mark_terminal(&mut self) {
        self.depth_budget = 0;
    }

    /// Install children; the caller guarantees the node was a leaf
    pub(crate) fn set_children(&mut self, children: [NodeId; 8]) {
        debug_assert!(self.children.is_none(), "node subdivided twice");
        self.children = Some(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::HandleMap;
    use crate::foundation::math::Vec3;

    fn bounds() -> AABB {
        AABB::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))
    }

    #[test]
    fn test_state_transitions() {
        let mut nodes: HandleMap<NodeId, OctreeNode> = HandleMap::with_key();
        let mut node = OctreeNode::new(bounds(), None, 0, 2);
        assert_eq!(node.state(), NodeState::Leaf);

        let ids: [NodeId; 8] = std::array::from_fn(|i| {
            nodes.insert(OctreeNode::new(bounds().octant(i), None, 1, 1))
        });
        node.set_children(ids);
        assert_eq!(node.state(), NodeState::Subdivided);

        let mut terminal = OctreeNode::new(bounds(), None, 0, 1);
        terminal.mark_terminal();
        assert_eq!(terminal.state(), NodeState::TerminalLeaf);
    }

    #[test]
    fn test_room_respects_capacity_and_budget() {
        let mut objects: HandleMap<ObjectId, ()> = HandleMap::with_key();
        let mut node = OctreeNode::new(bounds(), None, 0, 3);
        node.push_object(objects.insert(()));
        node.push_object(objects.insert(()));
        assert!(!node.has_room(2));
        assert!(node.has_room(3));

        let mut terminal = OctreeNode::new(bounds(), None, 0, 0);
        for _ in 0..10 {
            terminal.push_object(objects.insert(()));
        }
        assert!(terminal.has_room(2));
    }

    #[test]
    fn test_remove_object() {
        let mut objects: HandleMap<ObjectId, ()> = HandleMap::with_key();
        let a = objects.insert(());
        let b = objects.insert(());
        let mut node = OctreeNode::new(bounds(), None, 0, 1);
        node.push_object(a);
        node.push_object(b);

        assert!(node.remove_object(a));
        assert!(!node.remove_object(a));
        assert_eq!(node.objects(), &[b]);
    }
}
