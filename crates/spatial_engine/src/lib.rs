//! # Spatial Engine
//!
//! Spatial partitioning subsystem for 3D scenes: a dynamic octree that indexes
//! point objects, keeps itself up to date as they move, and can visualize its
//! own subdivision through a pluggable debug renderer.
//!
//! ## Features
//!
//! - **Octree**: capacity-driven subdivision with a per-node depth budget
//! - **Dynamic Objects**: stable handles and incremental re-indexing on move
//! - **Queries**: sphere, box and ray broad-phase queries
//! - **Debug Drawing**: depth-colored node bounds through [`debug::DebugRenderer`]
//! - **Configuration**: TOML/RON files validated on load
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_engine::prelude::*;
//!
//! let bounds = AABB::new(Vec3::repeat(-10.0), Vec3::repeat(10.0));
//! let config = OctreeConfig::new().with_capacity(4).with_max_depth(3);
//! let mut octree = Octree::with_config(bounds, config).unwrap();
//!
//! let ship = octree.insert(Vec3::new(5.0, 5.0, 5.0), "ship").id;
//! octree.set_position(ship, Vec3::new(-5.0, 2.0, 1.0)).unwrap();
//!
//! let mut debug = DebugDrawSystem::new();
//! let report = octree.update(&mut debug);
//! assert_eq!(report.examined, 1);
//! assert_eq!(octree.query_radius(Vec3::new(-5.0, 2.0, 1.0), 0.5), vec![ship]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

// Core engine modules
pub mod core;

pub mod config;
pub mod debug;
pub mod error;
pub mod foundation;
pub mod spatial;

pub use error::{SpatialError, SpatialResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{DebugDrawConfig, DemoConfig, OctreeConfig, SpatialConfig},
        debug::{DebugDrawSystem, DebugRenderer, NullDebugRenderer},
        error::{SpatialError, SpatialResult},
        foundation::{
            collections::{NodeId, ObjectId},
            math::{Vec3, Vec4},
            time::{FrameTimings, Stopwatch},
        },
        spatial::{
            InsertOutcome, Octree, OctreeNode, OctreeStats, Placement, SpatialQuery,
            UpdateReport, AABB,
        },
    };
}
