//! Debug drawing primitives and system
//!
//! The spatial code never talks to a graphics API. It emits boxes through the
//! [`DebugRenderer`] trait; a host either forwards them to its renderer, keeps
//! them in a [`DebugDrawSystem`], or discards them with [`NullDebugRenderer`].

use crate::foundation::math::{Vec3, Vec4};
use crate::spatial::AABB;

/// Sink for debug geometry
pub trait DebugRenderer {
    /// Draw a wireframe box
    fn draw_box(&mut self, bounds: &AABB, color: Vec4, line_width: f32);
}

/// Renderer that discards everything, for headless runs and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDebugRenderer;

impl DebugRenderer for NullDebugRenderer {
    fn draw_box(&mut self, _bounds: &AABB, _color: Vec4, _line_width: f32) {}
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Wireframe axis-aligned box
    Box {
        bounds: AABB,
        color: Vec4,
        line_width: f32,
        duration: f32,
    },

    /// Point at position
    Point {
        position: Vec3,
        color: Vec4,
        size: f32,
        duration: f32,
    },
}

impl DebugShape {
    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Box { duration, .. } | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            DebugShape::Box { duration, .. } | DebugShape::Point { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Debug drawing system that retains shapes for a host renderer
///
/// This is the explicitly owned resource context for debug visualization:
/// create one, hand it to whatever draws, and let the host read
/// [`shapes`](Self::shapes) each frame.
#[derive(Debug)]
pub struct DebugDrawSystem {
    shapes: Vec<DebugShape>,

    /// Lifetime given to boxes emitted through [`DebugRenderer`]
    pub box_duration: f32,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            box_duration: 0.0,
            enabled: true,
        }
    }

    /// Create a system whose boxes live for `duration` seconds
    pub fn with_box_duration(duration: f32) -> Self {
        Self {
            box_duration: duration,
            ..Self::new()
        }
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        if !self.enabled {
            return;
        }

        self.shapes.push(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Update shape lifetimes and remove expired shapes
    pub fn update(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering
    pub fn shapes(&self) -> &[DebugShape] {
        if self.enabled {
            &self.shapes
        } else {
            &[]
        }
    }

    /// Iterate over retained boxes only
    pub fn boxes(&self) -> impl Iterator<Item = (&AABB, &Vec4)> + '_ {
        self.shapes().iter().filter_map(|shape| match shape {
            DebugShape::Box { bounds, color, .. } => Some((bounds, color)),
            DebugShape::Point { .. } => None,
        })
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Clear all shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugRenderer for DebugDrawSystem {
    fn draw_box(&mut self, bounds: &AABB, color: Vec4, line_width: f32) {
        if !self.enabled {
            return;
        }

        self.shapes.push(DebugShape::Box {
            bounds: *bounds,
            color,
            line_width,
            duration: self.box_duration,
        });
    }
}
