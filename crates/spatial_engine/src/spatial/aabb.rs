//! Axis-aligned bounding boxes
//!
//! All tests are closed: points and boxes touching a face count as inside or
//! intersecting. The octree relies on this for its boundary policy.

use serde::{Deserialize, Serialize};

use crate::error::{SpatialError, SpatialResult};
use crate::foundation::math::{utils, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
///
/// Invariant: `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB spanning two corners given in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: utils::component_min(&a, &b),
            max: utils::component_max(&a, &b),
        }
    }

    /// Create an AABB from explicit corners, rejecting non-finite or inverted input
    pub fn try_new(min: Vec3, max: Vec3) -> SpatialResult<Self> {
        if !utils::is_finite(&min) || !utils::is_finite(&max) {
            return Err(SpatialError::InvalidBounds(format!(
                "non-finite corner: min {:?}, max {:?}",
                min.as_slice(),
                max.as_slice()
            )));
        }
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(SpatialError::InvalidBounds(format!(
                "min {:?} exceeds max {:?}",
                min.as_slice(),
                max.as_slice()
            )));
        }
        Ok(Self { min, max })
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let extents = extents.abs();
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Degenerate box collapsed onto a single point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Volume of the box (zero for degenerate boxes)
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB fully contains another AABB
    pub fn contains_aabb(&self, other: &AABB) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Check if a sphere overlaps this AABB
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = utils::clamp_point(&center, &self.min, &self.max);
        (closest - center).magnitude_squared() <= radius * radius
    }

    /// Volume shared with another box, zero when they only touch
    pub fn overlap_volume(&self, other: &AABB) -> f32 {
        let lo = utils::component_max(&self.min, &other.min);
        let hi = utils::component_min(&self.max, &other.max);
        let size = (hi - lo).sup(&Vec3::zeros());
        size.x * size.y * size.z
    }

    /// Bounds of octant `index` (0-7)
    ///
    /// Bit 0 selects the X half, bit 1 the Y half, bit 2 the Z half; a clear
    /// bit means the lower half `[min, center]`, a set bit the upper half
    /// `[center, max]`. Halves share the center plane exactly.
    pub fn octant(&self, index: usize) -> AABB {
        debug_assert!(index < 8, "octant index out of range: {index}");
        let center = self.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit == 0 { (lo, mid) } else { (mid, hi) }
        };
        let (min_x, max_x) = pick(1, self.min.x, center.x, self.max.x);
        let (min_y, max_y) = pick(2, self.min.y, center.y, self.max.y);
        let (min_z, max_z) = pick(4, self.min.z, center.z, self.max.z);
        AABB {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }

    /// Split into the eight octants in index order
    pub fn octants(&self) -> [AABB; 8] {
        std::array::from_fn(|index| self.octant(index))
    }

    /// Octant index a point falls into, preferring upper halves on the center plane
    pub fn octant_index(&self, point: Vec3) -> usize {
        let center = self.center();
        let x_bit = usize::from(point.x >= center.x);
        let y_bit = usize::from(point.y >= center.y);
        let z_bit = usize::from(point.z >= center.z);
        (z_bit << 2) | (y_bit << 1) | x_bit
    }

    /// Grow the box uniformly on every side
    pub fn expanded(&self, amount: f32) -> AABB {
        let delta = Vec3::repeat(amount);
        AABB::new(self.min - delta, self.max + delta)
    }

    /// Test ray intersection with this AABB using slab method
    /// Returns the distance to the entry point if the ray intersects, None otherwise
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv = |d: f32| if d == 0.0 { f32::INFINITY } else { 1.0 / d };
        let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        for axis in 0..3 {
            if ray_dir[axis] == 0.0 {
                // Parallel to this slab: miss unless the origin lies inside it
                if ray_origin[axis] < self.min[axis] || ray_origin[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - ray_origin[axis]) * inv_dir[axis];
            let t2 = (self.max[axis] - ray_origin[axis]) * inv_dir[axis];
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube(half: f32) -> AABB {
        AABB::new(Vec3::repeat(-half), Vec3::repeat(half))
    }

    #[test]
    fn test_new_orders_corners() {
        let aabb = AABB::new(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 2.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn test_try_new_rejects_bad_corners() {
        assert!(AABB::try_new(Vec3::repeat(1.0), Vec3::repeat(-1.0)).is_err());
        assert!(AABB::try_new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::repeat(1.0)).is_err());
        assert!(AABB::try_new(Vec3::repeat(0.0), Vec3::repeat(0.0)).is_ok());
    }

    #[test]
    fn test_closed_containment() {
        let aabb = cube(10.0);
        assert!(aabb.contains_point(Vec3::new(10.0, -10.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::new(10.001, 0.0, 0.0)));
        assert!(aabb.intersects(&AABB::from_point(Vec3::new(0.0, 10.0, 0.0))));
    }

    #[test]
    fn test_octants_partition_parent() {
        let parent = AABB::new(Vec3::new(-10.0, -4.0, 2.0), Vec3::new(6.0, 8.0, 3.0));
        let octants = parent.octants();

        let total: f32 = octants.iter().map(AABB::volume).sum();
        assert_relative_eq!(total, parent.volume(), epsilon = 1e-3);

        for (i, a) in octants.iter().enumerate() {
            assert!(parent.contains_aabb(a));
            for b in &octants[i + 1..] {
                assert_eq!(a.overlap_volume(b), 0.0);
            }
        }

        // Union of child extremes is exactly the parent
        let min = octants.iter().fold(Vec3::repeat(f32::MAX), |acc, o| acc.inf(&o.min));
        let max = octants.iter().fold(Vec3::repeat(f32::MIN), |acc, o| acc.sup(&o.max));
        assert_eq!(min, parent.min);
        assert_eq!(max, parent.max);
    }

    #[test]
    fn test_octant_bit_order() {
        let parent = cube(10.0);
        assert_eq!(parent.octant(0), AABB::new(Vec3::repeat(-10.0), Vec3::zeros()));
        assert_eq!(parent.octant(7), AABB::new(Vec3::zeros(), Vec3::repeat(10.0)));

        let x_only = parent.octant(1);
        assert_eq!(x_only.min, Vec3::new(0.0, -10.0, -10.0));
        assert_eq!(x_only.max, Vec3::new(10.0, 0.0, 0.0));

        let z_only = parent.octant(4);
        assert_eq!(z_only.min, Vec3::new(-10.0, -10.0, 0.0));
        assert_eq!(z_only.max, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_octant_index_matches_octant_bounds() {
        let parent = cube(10.0);
        let point = Vec3::new(3.0, -2.0, 7.0);
        let index = parent.octant_index(point);
        assert_eq!(index, 0b101);
        assert!(parent.octant(index).contains_point(point));
    }

    #[test]
    fn test_sphere_overlap() {
        let aabb = cube(1.0);
        assert!(aabb.intersects_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(!aabb.intersects_sphere(Vec3::new(2.0, 2.0, 0.0), 1.0));
        assert!(aabb.intersects_sphere(Vec3::zeros(), 0.0));
    }

    #[test]
    fn test_ray_hits_and_misses() {
        let aabb = cube(1.0);

        let hit = aabb.intersect_ray(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(hit.unwrap(), 4.0, epsilon = 1e-5);

        let inside = aabb.intersect_ray(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(inside, Some(0.0));

        let behind = aabb.intersect_ray(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(behind.is_none());

        let parallel_miss = aabb.intersect_ray(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(parallel_miss.is_none());
    }

    #[test]
    fn test_expanded_grows_every_side() {
        let grown = cube(1.0).expanded(0.5);
        assert_relative_eq!(grown.min, Vec3::repeat(-1.5));
        assert_relative_eq!(grown.max, Vec3::repeat(1.5));
        assert!(grown.contains_point(Vec3::new(1.4, -1.4, 0.0)));

        // Shrinking past the center keeps min <= max
        let collapsed = cube(1.0).expanded(-2.0);
        assert!(collapsed.min.x <= collapsed.max.x);
    }

    #[test]
    fn test_center_extents_round_trip() {
        let aabb = AABB::from_center_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 2.0));
        assert_relative_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(aabb.extents(), Vec3::new(0.5, 1.0, 2.0));
        assert_relative_eq!(aabb.volume(), 8.0);
    }
}
