//! Spatial partitioning data structures
//!
//! Provides efficient spatial indexing for collision detection,
//! ray casting, and proximity queries in 3D space.

mod aabb;
mod node;
mod octree;
pub mod spatial_query;

#[cfg(test)]
mod tests;

pub use crate::foundation::collections::{NodeId, ObjectId};
pub use aabb::AABB;
pub use node::{NodeState, OctreeNode};
pub use octree::{
    InsertOutcome, ObjectEntry, Octree, OctreeCounters, OctreeStats, Placement, UpdateReport,
};
pub use spatial_query::{LinearSpatialQuery, SpatialQuery};
