//! Debug module for visualization and debugging tools
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 10.2:
//! "Debug Drawing Facilities"

pub mod draw;
pub mod palette;

pub use draw::{DebugDrawSystem, DebugRenderer, DebugShape, NullDebugRenderer};
pub use palette::{depth_color, ObjectDebugColors};
