//! # Core Engine Module
//!
//! Shared configuration used by the spatial subsystem and its hosts.
//!
//! ## Organization
//!
//! - **Config**: octree, debug-draw and demo settings loadable from TOML/RON
//! - **Foundation**: low-level utilities (math, handles, time, logging)

pub mod config;

// Re-export foundation for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    ConfigFormat,
    DebugDrawConfig,
    DemoConfig,
    OctreeConfig,
    SpatialConfig,
};
