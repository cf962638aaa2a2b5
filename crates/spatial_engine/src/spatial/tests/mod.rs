//! Behavioral tests for the octree as a whole


use crate::core::config::OctreeConfig;
use crate::foundation::math::Vec3;
use crate::spatial::{Octree, AABB};

/// Cube `[-half, half]^3`
fn cube(half: f32) -> AABB {
    AABB::new(Vec3::repeat(-half), Vec3::repeat(half))
}

fn tree<T>(half: f32, capacity: usize, depth: u32) -> Octree<T> {
    let config = OctreeConfig::new().with_capacity(capacity).with_max_depth(depth);
    Octree::with_config(cube(half), config).unwrap()
}

/// Deterministic scatter of points strictly inside `[-half, half]^3`
fn scatter(count: usize, half: f32) -> Vec<Vec3> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32) * 1.8 - 0.9
    };
    (0..count)
        .map(|_| Vec3::new(next(), next(), next()) * half)
        .collect()
}
