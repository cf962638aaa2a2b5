//! Handle types for arena-backed collections

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node inside an octree's node arena
    pub struct NodeId;

    /// Stable handle to an object tracked by an octree
    ///
    /// Handles stay valid while the object moves between nodes and are
    /// invalidated only by removal or by clearing the tree.
    pub struct ObjectId;
}

/// Arena of values addressed by `K`
pub type HandleMap<K, T> = SlotMap<K, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_survive_unrelated_removal() {
        let mut map: HandleMap<ObjectId, &str> = HandleMap::with_key();
        let a = map.insert("a");
        let b = map.insert("b");

        map.remove(a);

        assert_eq!(map.get(b), Some(&"b"));
        assert!(map.get(a).is_none());
    }

    #[test]
    fn test_stale_handle_not_reused() {
        let mut map: HandleMap<NodeId, u32> = HandleMap::with_key();
        let first = map.insert(1);
        map.remove(first);
        let second = map.insert(2);

        assert_ne!(first, second);
        assert!(!map.contains_key(first));
    }
}
