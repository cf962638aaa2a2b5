//! Abstract spatial query interface for broad-phase collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! This abstraction allows swapping different spatial partitioning schemes
//! (octree, grid, BVH, etc.) without changing the code that queries them.
//! [`LinearSpatialQuery`] is the brute-force scheme used as a reference.

use crate::error::{SpatialError, SpatialResult};
use crate::foundation::collections::{HandleMap, ObjectId};
use crate::foundation::math::Vec3;
use crate::spatial::{ObjectEntry, Octree, AABB};

/// Abstract interface for spatial partitioning used in broad-phase collision detection
///
/// GEA 13.3.2: "The broad phase quickly identifies pairs of objects that might
/// be colliding using some kind of spatial partitioning scheme."
pub trait SpatialQuery<T>: Send + Sync {
    /// Insert an object at a position
    fn insert(&mut self, position: Vec3, data: T) -> ObjectId;

    /// Remove an object, returning its payload
    fn remove(&mut self, id: ObjectId) -> Option<T>;

    /// Move an object
    fn update(&mut self, id: ObjectId, position: Vec3) -> SpatialResult<()>;

    /// Apply pending moves to the underlying structure
    fn refresh(&mut self);

    /// Objects within `radius` of another object, excluding itself
    fn query_nearby(&self, id: ObjectId, radius: f32) -> Vec<ObjectId> {
        match self.position(id) {
            Some(center) => self
                .query_sphere(center, radius)
                .into_iter()
                .filter(|&other| other != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Query objects within a sphere
    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId>;

    /// Query objects within an AABB
    fn query_aabb(&self, aabb: &AABB) -> Vec<ObjectId>;

    /// Current position of an object
    fn position(&self, id: ObjectId) -> Option<Vec3>;

    /// Clear all objects from the spatial structure
    fn clear(&mut self);

    /// Get the number of objects in the structure
    fn object_count(&self) -> usize;
}

impl<T: Send + Sync> SpatialQuery<T> for Octree<T> {
    fn insert(&mut self, position: Vec3, data: T) -> ObjectId {
        Octree::insert(self, position, data).id
    }

    fn remove(&mut self, id: ObjectId) -> Option<T> {
        Octree::remove(self, id).map(|entry| entry.data)
    }

    fn update(&mut self, id: ObjectId, position: Vec3) -> SpatialResult<()> {
        self.set_position(id, position)
    }

    fn refresh(&mut self) {
        self.reindex();
    }

    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId> {
        self.query_radius(center, radius)
    }

    fn query_aabb(&self, aabb: &AABB) -> Vec<ObjectId> {
        Octree::query_aabb(self, aabb)
    }

    fn position(&self, id: ObjectId) -> Option<Vec3> {
        Octree::position(self, id)
    }

    fn clear(&mut self) {
        Octree::clear(self);
    }

    fn object_count(&self) -> usize {
        self.len()
    }
}

/// Brute-force scheme that tests every object on every query
#[derive(Debug)]
pub struct LinearSpatialQuery<T> {
    objects: HandleMap<ObjectId, ObjectEntry<T>>,
}

impl<T> LinearSpatialQuery<T> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            objects: HandleMap::with_key(),
        }
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&ObjectEntry<T>> {
        self.objects.get(id)
    }

    fn matching(&self, predicate: impl Fn(Vec3) -> bool) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, entry)| predicate(entry.position))
            .map(|(id, _)| id)
            .collect()
    }
}

impl<T> Default for LinearSpatialQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> SpatialQuery<T> for LinearSpatialQuery<T> {
    fn insert(&mut self, position: Vec3, data: T) -> ObjectId {
        self.objects.insert(ObjectEntry { position, data })
    }

    fn remove(&mut self, id: ObjectId) -> Option<T> {
        self.objects.remove(id).map(|entry| entry.data)
    }

    fn update(&mut self, id: ObjectId, position: Vec3) -> SpatialResult<()> {
        let entry = self
            .objects
            .get_mut(id)
            .ok_or(SpatialError::UnknownObject(id))?;
        entry.position = position;
        Ok(())
    }

    fn refresh(&mut self) {}

    fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId> {
        let radius_sq = radius * radius;
        self.matching(|position| (position - center).magnitude_squared() <= radius_sq)
    }

    fn query_aabb(&self, aabb: &AABB) -> Vec<ObjectId> {
        self.matching(|position| aabb.contains_point(position))
    }

    fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.objects.get(id).map(|entry| entry.position)
    }

    fn clear(&mut self) {
        self.objects.clear();
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OctreeConfig;

    fn world() -> AABB {
        AABB::new(Vec3::repeat(-50.0), Vec3::repeat(50.0))
    }

    fn octree() -> Octree<u32> {
        Octree::with_config(world(), OctreeConfig::new().with_capacity(2).with_max_depth(5)).unwrap()
    }

    fn payloads<S: SpatialQuery<u32>>(
        index: &S,
        ids: Vec<ObjectId>,
        lookup: impl Fn(&S, ObjectId) -> u32,
    ) -> Vec<u32> {
        let mut data: Vec<u32> = ids.into_iter().map(|id| lookup(index, id)).collect();
        data.sort_unstable();
        data
    }

    #[test]
    fn test_spatial_query_insert_remove() {
        let mut spatial: Box<dyn SpatialQuery<u32>> = Box::new(octree());
        let id = spatial.insert(Vec3::zeros(), 7);
        assert_eq!(spatial.object_count(), 1);

        assert_eq!(spatial.remove(id), Some(7));
        assert_eq!(spatial.object_count(), 0);
        assert!(spatial.update(id, Vec3::zeros()).is_err());
    }

    #[test]
    fn test_octree_matches_linear_scan() {
        let mut tree = octree();
        let mut linear = LinearSpatialQuery::new();
        let mut pairs = Vec::new();

        for i in 0..60u32 {
            let t = i as f32;
            let position = Vec3::new((t * 7.3) % 90.0 - 45.0, (t * 3.1) % 90.0 - 45.0, (t * 5.7) % 90.0 - 45.0);
            let a = SpatialQuery::insert(&mut tree, position, i);
            let b = linear.insert(position, i);
            pairs.push((a, b));
        }

        // Move a third of them, a few out of the world
        for (i, &(a, b)) in pairs.iter().enumerate().filter(|(i, _)| i % 3 == 0) {
            let position = Vec3::new(i as f32 * 1.5 - 40.0, 10.0, -(i as f32));
            let position = if i % 9 == 0 { position * 3.0 } else { position };
            SpatialQuery::update(&mut tree, a, position).unwrap();
            linear.update(b, position).unwrap();
        }
        SpatialQuery::refresh(&mut tree);

        let tree_data = |t: &Octree<u32>, id| t.get(id).unwrap().data;
        let linear_data = |l: &LinearSpatialQuery<u32>, id| l.get(id).unwrap().data;

        for (center, radius) in [(Vec3::zeros(), 20.0), (Vec3::new(30.0, -10.0, 5.0), 12.5), (Vec3::repeat(60.0), 40.0)] {
            assert_eq!(
                payloads(&tree, SpatialQuery::query_sphere(&tree, center, radius), tree_data),
                payloads(&linear, linear.query_sphere(center, radius), linear_data),
            );
        }

        let region = AABB::new(Vec3::new(-20.0, -45.0, -10.0), Vec3::new(25.0, 15.0, 40.0));
        assert_eq!(
            payloads(&tree, SpatialQuery::query_aabb(&tree, &region), tree_data),
            payloads(&linear, linear.query_aabb(&region), linear_data),
        );
    }

    #[test]
    fn test_query_nearby_excludes_self() {
        let mut spatial = LinearSpatialQuery::new();
        let a = spatial.insert(Vec3::zeros(), 0u32);
        let b = spatial.insert(Vec3::new(1.0, 0.0, 0.0), 1);
        spatial.insert(Vec3::new(10.0, 0.0, 0.0), 2);

        assert_eq!(spatial.query_nearby(a, 2.0), vec![b]);
        spatial.remove(a);
        assert!(spatial.query_nearby(a, 2.0).is_empty());
    }
}
