//! Color schemes for spatial debug visualization

use crate::foundation::math::Vec4;

/// Color of a node box from its remaining depth budget
///
/// `hue = budget / divisor`, clamped to `[0, 1]`; the color runs from green
/// (no budget left, deepest nodes) to red (budget at or above the divisor).
pub fn depth_color(depth_budget: u32, divisor: f32) -> Vec4 {
    let hue = if divisor > 0.0 {
        (depth_budget as f32 / divisor).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Vec4::new(hue, 1.0 - hue, 0.0, 1.0)
}

/// Colors for object markers drawn alongside node bounds
#[derive(Clone, Debug)]
pub struct ObjectDebugColors {
    /// Objects indexed inside the tree
    pub indexed: Vec4,

    /// Objects retained outside the world bounds
    pub out_of_bounds: Vec4,
}

impl Default for ObjectDebugColors {
    fn default() -> Self {
        Self {
            indexed: Vec4::new(0.0, 1.0, 1.0, 1.0),       // Cyan
            out_of_bounds: Vec4::new(1.0, 0.0, 1.0, 1.0), // Magenta
        }
    }
}
