//! Math utilities and types
//!
//! Thin aliases over nalgebra so the spatial code reads in engine terms.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// Component-wise helpers that nalgebra does not name directly
pub mod utils {
    use super::Vec3;

    /// Component-wise minimum of two vectors
    pub fn component_min(a: &Vec3, b: &Vec3) -> Vec3 {
        a.inf(b)
    }

    /// Component-wise maximum of two vectors
    pub fn component_max(a: &Vec3, b: &Vec3) -> Vec3 {
        a.sup(b)
    }

    /// True when every component is finite (no NaN or infinity)
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Clamp a point into the box spanned by `min` and `max`
    pub fn clamp_point(point: &Vec3, min: &Vec3, max: &Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(min.x, max.x),
            point.y.clamp(min.y, max.y),
            point.z.clamp(min.z, max.z),
        )
    }
}
