//! Octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical regions for fast spatial queries. A
//! node holds objects directly until it reaches `node_capacity`; the next
//! insertion subdivides it into eight octants and is routed into every octant
//! whose closed bounds contain the object's position. Objects admitted before
//! the split stay where they are.
//!
//! Points lying exactly on a split plane are stored in every child touching
//! that plane. Queries deduplicate, so callers see each object once; the node
//! level exposes the duplicates through [`Octree::homes`].
//!
//! Objects are tracked by [`ObjectId`] with a reverse map to the nodes that
//! hold them, so moving an object ([`Octree::set_position`]) is cheap and the
//! per-frame [`Octree::update`] only revisits objects that actually moved.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::core::config::OctreeConfig;
use crate::debug::{depth_color, DebugRenderer};
use crate::error::{SpatialError, SpatialResult};
use crate::foundation::collections::{HandleMap, NodeId, ObjectId};
use crate::foundation::math::Vec3;
use crate::spatial::{OctreeNode, AABB};

/// Position plus opaque payload stored in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry<T> {
    /// World-space position
    pub position: Vec3,
    /// Caller payload (entity handle, tag, ...)
    pub data: T,
}

/// Where an object ended up after insertion or re-indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Held by `nodes` nodes (more than one on shared boundaries)
    Indexed {
        /// Number of nodes holding the object
        nodes: usize,
    },
    /// Outside the root bounds; tracked by the tree but held by no node
    OutOfBounds,
}

/// Result of [`Octree::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Handle of the new object
    pub id: ObjectId,
    /// Where it was stored
    pub placement: Placement,
}

/// Summary of one maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Moved objects that were checked
    pub examined: usize,
    /// Objects re-inserted into a different part of the tree
    pub relocated: usize,
    /// Objects that left the root bounds this pass
    pub left_bounds: usize,
    /// Out-of-bounds objects that came back inside
    pub reentered: usize,
    /// Node boxes sent to the debug renderer
    pub boxes_drawn: usize,
}

/// Lifetime counters for degenerate or noteworthy paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeCounters {
    /// Nodes split into eight children
    pub subdivisions: u64,
    /// Nodes that overflowed with no depth budget left for children
    pub terminal_marks: u64,
    /// Insertions whose position was outside the root bounds
    pub out_of_bounds_inserts: u64,
    /// Routings that found no matching child and kept the object at the parent
    pub retained_at_parent: u64,
    /// Objects detached and re-inserted by maintenance
    pub relocations: u64,
}

/// Snapshot of the tree's shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Total nodes including the root
    pub node_count: usize,
    /// Nodes without children
    pub leaf_count: usize,
    /// Leaves with no depth budget left
    pub terminal_leaf_count: usize,
    /// Distinct tracked objects
    pub object_count: usize,
    /// Object references across all node lists (counts duplicates)
    pub stored_entries: usize,
    /// Objects held by more than one node
    pub multi_homed_objects: usize,
    /// Objects outside the root bounds
    pub out_of_bounds_objects: usize,
    /// Level of the deepest node
    pub deepest_level: u32,
}

#[derive(Debug)]
struct TrackedObject<T> {
    entry: ObjectEntry<T>,
    homes: Vec<NodeId>,
    dirty: bool,
}

enum Relocation {
    Stayed,
    Moved,
    LeftBounds,
    Reentered,
}

/// Octree spatial partitioning structure
#[derive(Debug)]
pub struct Octree<T> {
    nodes: HandleMap<NodeId, OctreeNode>,
    root: NodeId,
    objects: HandleMap<ObjectId, TrackedObject<T>>,
    out_of_bounds: Vec<ObjectId>,
    dirty: Vec<ObjectId>,
    config: OctreeConfig,
    counters: OctreeCounters,
}

impl<T> Octree<T> {
    /// Create a new octree with default configuration
    pub fn new(world_bounds: AABB) -> Self {
        Self::build(world_bounds, OctreeConfig::default())
    }

    /// Create a new octree, validating bounds and configuration
    pub fn with_config(world_bounds: AABB, config: OctreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        let world_bounds = AABB::try_new(world_bounds.min, world_bounds.max)?;
        if world_bounds.size().min() <= 0.0 {
            return Err(SpatialError::InvalidBounds(format!(
                "world bounds have zero size on some axis: {:?}",
                world_bounds.size().as_slice()
            )));
        }
        Ok(Self::build(world_bounds, config))
    }

    fn build(world_bounds: AABB, config: OctreeConfig) -> Self {
        let mut nodes = HandleMap::with_key();
        let root = nodes.insert(OctreeNode::new(world_bounds, None, 0, config.max_depth));
        debug!(
            "octree created: capacity {}, depth budget {}",
            config.node_capacity, config.max_depth
        );
        Self {
            nodes,
            root,
            objects: HandleMap::with_key(),
            out_of_bounds: Vec::new(),
            dirty: Vec::new(),
            config,
            counters: OctreeCounters::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// World bounds covered by the root
    pub fn bounds(&self) -> &AABB {
        self.nodes[self.root].bounds()
    }

    /// Insert an object into the octree
    ///
    /// Never fails: positions outside the root bounds are kept in the
    /// out-of-bounds list and reported as [`Placement::OutOfBounds`].
    pub fn insert(&mut self, position: Vec3, data: T) -> InsertOutcome {
        let id = self.objects.insert(TrackedObject {
            entry: ObjectEntry { position, data },
            homes: Vec::new(),
            dirty: false,
        });

        let placement = if self.bounds().contains_point(position) {
            self.index_from(self.root, id, position)
        } else {
            self.counters.out_of_bounds_inserts += 1;
            self.out_of_bounds.push(id);
            warn!("object {id:?} inserted outside world bounds at {:?}", position.as_slice());
            Placement::OutOfBounds
        };

        InsertOutcome { id, placement }
    }

    /// Remove an object from the octree
    pub fn remove(&mut self, id: ObjectId) -> Option<ObjectEntry<T>> {
        let tracked = self.objects.remove(id)?;
        if tracked.homes.is_empty() {
            self.out_of_bounds.retain(|&other| other != id);
        }
        for &home in &tracked.homes {
            self.nodes[home].remove_object(id);
        }
        Some(tracked.entry)
    }

    /// Move an object; the tree catches up on the next [`reindex`](Self::reindex) or [`update`](Self::update)
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> SpatialResult<()> {
        let tracked = self
            .objects
            .get_mut(id)
            .ok_or(SpatialError::UnknownObject(id))?;
        tracked.entry.position = position;
        if !tracked.dirty {
            tracked.dirty = true;
            self.dirty.push(id);
        }
        Ok(())
    }

    /// Per-frame maintenance: re-index moved objects, then draw node bounds if enabled
    pub fn update<R: DebugRenderer + ?Sized>(&mut self, renderer: &mut R) -> UpdateReport {
        let mut report = self.reindex();
        if self.config.debug.enabled {
            report.boxes_drawn = self.debug_draw(renderer);
        }
        report
    }

    /// Re-index every object moved since the last pass
    pub fn reindex(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();

        for id in std::mem::take(&mut self.dirty) {
            // Removed since being marked
            let Some(tracked) = self.objects.get_mut(id) else {
                continue;
            };
            tracked.dirty = false;
            report.examined += 1;

            match self.relocate(id) {
                Relocation::Stayed => {}
                Relocation::Moved => report.relocated += 1,
                Relocation::LeftBounds => report.left_bounds += 1,
                Relocation::Reentered => report.reentered += 1,
            }
        }

        if report.examined > 0 {
            debug!(
                "reindex: {} examined, {} relocated, {} left bounds, {} re-entered",
                report.examined, report.relocated, report.left_bounds, report.reentered
            );
        }
        report
    }

    fn relocate(&mut self, id: ObjectId) -> Relocation {
        let Some(tracked) = self.objects.get_mut(id) else {
            return Relocation::Stayed;
        };
        let position = tracked.entry.position;
        let root_contains = self.nodes[self.root].bounds().contains_point(position);

        if tracked.homes.is_empty() {
            if !root_contains {
                return Relocation::Stayed;
            }
            self.out_of_bounds.retain(|&other| other != id);
            self.counters.relocations += 1;
            self.index_from(self.root, id, position);
            debug!("object {id:?} re-entered world bounds");
            return Relocation::Reentered;
        }

        let nodes = &self.nodes;
        if tracked
            .homes
            .iter()
            .all(|&home| nodes[home].bounds().contains_point(position))
        {
            return Relocation::Stayed;
        }

        let homes = std::mem::take(&mut tracked.homes);
        for &home in &homes {
            self.nodes[home].remove_object(id);
        }
        self.counters.relocations += 1;

        // Lowest ancestor of the old home that contains the new position
        let mut start = homes.first().copied();
        while let Some(node_id) = start {
            if self.nodes[node_id].bounds().contains_point(position) {
                break;
            }
            start = self.nodes[node_id].parent();
        }

        match start {
            Some(ancestor) => {
                trace!("object {id:?} re-inserted from {ancestor:?}");
                self.index_from(ancestor, id, position);
                Relocation::Moved
            }
            None => {
                warn!("object {id:?} left world bounds at {:?}", position.as_slice());
                self.out_of_bounds.push(id);
                Relocation::LeftBounds
            }
        }
    }

    fn index_from(&mut self, start: NodeId, id: ObjectId, position: Vec3) -> Placement {
        let mut homes = Vec::new();
        self.insert_at(start, id, position, &mut homes);
        let nodes = homes.len();
        if let Some(tracked) = self.objects.get_mut(id) {
            tracked.homes = homes;
        }
        Placement::Indexed { nodes }
    }

    fn insert_at(&mut self, node_id: NodeId, id: ObjectId, position: Vec3, homes: &mut Vec<NodeId>) {
        if self.nodes[node_id].has_room(self.config.node_capacity) {
            self.hold(node_id, id, homes);
            return;
        }

        if self.nodes[node_id].is_leaf() && !self.subdivide(node_id) {
            // Became a terminal leaf, which takes any number of objects
            self.hold(node_id, id, homes);
            return;
        }

        let Some(&children) = self.nodes[node_id].children() else {
            self.hold(node_id, id, homes);
            return;
        };

        let point = AABB::from_point(position);
        let before = homes.len();
        for child in children {
            if self.nodes[child].bounds().intersects(&point) {
                self.insert_at(child, id, position, homes);
            }
        }

        if homes.len() == before {
            self.counters.retained_at_parent += 1;
            warn!(
                "object {id:?} at {:?} matched no child of {node_id:?}, retained at parent",
                position.as_slice()
            );
            self.hold(node_id, id, homes);
        }
    }

    fn hold(&mut self, node_id: NodeId, id: ObjectId, homes: &mut Vec<NodeId>) {
        self.nodes[node_id].push_object(id);
        homes.push(node_id);
        trace!("object {id:?} held by {node_id:?}");
    }

    /// Split a leaf into eight children
    ///
    /// Returns false when the children would have no depth budget or the node
    /// has zero size on some axis; the node is then marked terminal instead.
    /// An already subdivided node is left untouched.
    fn subdivide(&mut self, node_id: NodeId) -> bool {
        let node = &self.nodes[node_id];
        if !node.is_leaf() {
            return true;
        }

        let child_budget = node.depth_budget().saturating_sub(1);
        let level = node.level() + 1;
        let octants = node.bounds().octants();
        // Flat boxes would hand every point to several children at every level
        let flat = node.bounds().size().min() <= 0.0;
        if child_budget == 0 || flat {
            self.nodes[node_id].mark_terminal();
            self.counters.terminal_marks += 1;
            if flat {
                debug!("node {node_id:?} at level {} has no volume, not subdividing", level - 1);
            } else {
                debug!("node {node_id:?} at level {} reached depth limit", level - 1);
            }
            return false;
        }

        let children = octants.map(|bounds| {
            self.nodes
                .insert(OctreeNode::new(bounds, Some(node_id), level, child_budget))
        });
        self.nodes[node_id].set_children(children);
        self.counters.subdivisions += 1;
        debug!("subdivided {node_id:?} into level {level} (budget {child_budget})");
        true
    }

    /// Draw every node's bounds, root first, children in octant order
    ///
    /// Returns the number of boxes drawn.
    pub fn debug_draw<R: DebugRenderer + ?Sized>(&self, renderer: &mut R) -> usize {
        let divisor = self.config.debug.depth_color_divisor;
        let line_width = self.config.debug.line_width;
        let mut drawn = 0;
        self.visit(|_, node| {
            renderer.draw_box(node.bounds(), depth_color(node.depth_budget(), divisor), line_width);
            drawn += 1;
        });
        drawn
    }

    /// Visit nodes in pre-order (parent before children, octant order)
    pub fn visit<F: FnMut(NodeId, &OctreeNode)>(&self, mut f: F) {
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            f(node_id, node);
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Objects within `radius` of `center`
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<ObjectId> {
        let radius_sq = radius * radius;
        self.collect(
            |bounds| bounds.intersects_sphere(center, radius),
            |position| (position - center).magnitude_squared() <= radius_sq,
            true,
        )
    }

    /// Objects whose position lies inside `aabb`
    pub fn query_aabb(&self, aabb: &AABB) -> Vec<ObjectId> {
        self.collect(
            |bounds| bounds.intersects(aabb),
            |position| aabb.contains_point(position),
            true,
        )
    }

    /// Candidate objects held by nodes the ray passes through
    ///
    /// Objects are points, so this is a broad-phase result; narrow-phase
    /// tests against the caller's shapes are still needed. Out-of-bounds
    /// objects are never returned.
    pub fn query_ray(&self, origin: Vec3, direction: Vec3) -> Vec<ObjectId> {
        self.collect(
            |bounds| bounds.intersect_ray(origin, direction).is_some(),
            |_| true,
            false,
        )
    }

    fn collect(
        &self,
        node_filter: impl Fn(&AABB) -> bool,
        object_filter: impl Fn(Vec3) -> bool,
        include_out_of_bounds: bool,
    ) -> Vec<ObjectId> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let mut stack = vec![self.root];

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            if !node_filter(node.bounds()) {
                continue;
            }
            for &id in node.objects() {
                if object_filter(self.objects[id].entry.position) && seen.insert(id) {
                    results.push(id);
                }
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }

        if include_out_of_bounds {
            results.extend(
                self.out_of_bounds
                    .iter()
                    .copied()
                    .filter(|&id| object_filter(self.objects[id].entry.position)),
            );
        }
        results
    }

    /// Chain of nodes from the root down to the deepest node containing `position`
    ///
    /// On split planes the upper octant is followed. Empty when the position
    /// is outside the world.
    pub fn locate(&self, position: Vec3) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.root;
        if !self.bounds().contains_point(position) {
            return chain;
        }
        loop {
            chain.push(current);
            let node = &self.nodes[current];
            match node.children() {
                Some(children) => current = children[node.bounds().octant_index(position)],
                None => return chain,
            }
        }
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&ObjectEntry<T>> {
        self.objects.get(id).map(|tracked| &tracked.entry)
    }

    /// Mutable access to an object's payload; positions change through [`set_position`](Self::set_position)
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(id).map(|tracked| &mut tracked.entry.data)
    }

    /// Current position of an object
    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.get(id).map(|entry| entry.position)
    }

    /// Whether the handle refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Nodes currently holding an object; empty for out-of-bounds objects
    pub fn homes(&self, id: ObjectId) -> Option<&[NodeId]> {
        self.objects.get(id).map(|tracked| tracked.homes.as_slice())
    }

    /// Objects tracked outside the root bounds
    pub fn out_of_bounds(&self) -> &[ObjectId] {
        &self.out_of_bounds
    }

    /// Iterate over all objects
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectEntry<T>)> + '_ {
        self.objects.iter().map(|(id, tracked)| (id, &tracked.entry))
    }

    /// Number of tracked objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when no objects are tracked
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Handle of the root node
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node
    pub fn root(&self) -> &OctreeNode {
        &self.nodes[self.root]
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.visit(|id, node| {
            if node.is_leaf() {
                leaves.push(id);
            }
        });
        leaves
    }

    /// Get all nodes at a specific level (root is level 0)
    pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        self.visit(|id, node| {
            if node.level() == level {
                nodes.push(id);
            }
        });
        nodes
    }

    /// Lifetime counters
    pub fn counters(&self) -> &OctreeCounters {
        &self.counters
    }

    /// Current shape of the tree
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            object_count: self.objects.len(),
            out_of_bounds_objects: self.out_of_bounds.len(),
            multi_homed_objects: self.objects.values().filter(|t| t.homes.len() > 1).count(),
            ..OctreeStats::default()
        };
        self.visit(|_, node| {
            stats.node_count += 1;
            stats.stored_entries += node.objects().len();
            stats.deepest_level = stats.deepest_level.max(node.level());
            if node.is_leaf() {
                stats.leaf_count += 1;
                if node.depth_budget() == 0 {
                    stats.terminal_leaf_count += 1;
                }
            }
        });
        stats
    }

    /// Clear the octree back to a single empty root
    pub fn clear(&mut self) {
        let bounds = *self.bounds();
        *self = Self::build(bounds, self.config.clone());
    }
}
