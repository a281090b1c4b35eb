//! Fixed-capacity item pool
//!
//! Items live in an arena for their whole lifetime. Free items wait in a
//! FIFO queue so reuse is spread evenly across the pool.

use std::collections::VecDeque;

use glam::Vec3;

use super::item::{ItemId, PoolItem, Presentable};
use crate::error::SkipReason;

/// Cumulative spawn/recycle counters for one streamer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub spawned: u64,
    pub recycled: u64,
    pub capacity_exhausted: u64,
    pub placement_failed: u64,
}

impl StreamStats {
    pub fn note_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::CapacityExhausted => self.capacity_exhausted += 1,
            SkipReason::PlacementFailed => self.placement_failed += 1,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.capacity_exhausted + self.placement_failed
    }
}

/// Arena of items plus the queue of those currently free
#[derive(Debug, Clone)]
pub struct ItemPool<H> {
    items: Vec<PoolItem<H>>,
    free: VecDeque<ItemId>,
}

impl<H: Presentable> ItemPool<H> {
    /// Build `capacity` items, all free and parked
    pub fn new(capacity: usize, mut make: impl FnMut() -> H) -> Self {
        let items: Vec<_> = (0..capacity).map(|_| PoolItem::new(make())).collect();
        let free = (0..capacity as u32).map(ItemId).collect();
        Self { items, free }
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn active_len(&self) -> usize {
        self.items.len() - self.free.len()
    }

    /// Next item `spawn` would hand out, without taking it
    pub fn peek(&self) -> Option<ItemId> {
        self.free.front().copied()
    }

    /// Take the oldest free item and activate it at `position`
    pub fn spawn(&mut self, position: Vec3) -> Option<ItemId> {
        let id = self.free.pop_front()?;
        self.items[id.index()].activate(position);
        Some(id)
    }

    /// Hide an active item and queue it for reuse. Returns false if it was
    /// already free.
    pub fn release(&mut self, id: ItemId) -> bool {
        let item = &mut self.items[id.index()];
        if !item.is_active() {
            return false;
        }
        item.deactivate();
        self.free.push_back(id);
        true
    }

    pub fn get(&self, id: ItemId) -> &PoolItem<H> {
        &self.items[id.index()]
    }

    pub fn get_mut(&mut self, id: ItemId) -> &mut PoolItem<H> {
        &mut self.items[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &PoolItem<H>)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemId(i as u32), item))
    }

    /// Hide everything and hand the host handles back
    pub fn into_handles(self) -> Vec<H> {
        self.items.into_iter().map(PoolItem::into_handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::{MarkerPrefab, Prefab};

    fn pool(capacity: usize) -> ItemPool<crate::sim::Marker> {
        let prefab = MarkerPrefab::new("Tile", 10.0);
        ItemPool::new(capacity, || prefab.instantiate())
    }

    #[test]
    fn test_new_pool_all_free() {
        let pool = pool(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_len(), 4);
        assert_eq!(pool.active_len(), 0);
        assert!(pool.iter().all(|(_, item)| !item.is_active()));
    }

    #[test]
    fn test_spawn_is_fifo_over_releases() {
        let mut pool = pool(3);
        let a = pool.spawn(Vec3::ZERO).unwrap();
        let b = pool.spawn(Vec3::ZERO).unwrap();
        let c = pool.spawn(Vec3::ZERO).unwrap();
        assert!(pool.spawn(Vec3::ZERO).is_none());

        pool.release(b);
        pool.release(a);
        assert_eq!(pool.peek(), Some(b));
        assert_eq!(pool.spawn(Vec3::Z), Some(b));
        assert_eq!(pool.spawn(Vec3::Z), Some(a));
        assert!(pool.get(c).is_active());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = pool(2);
        let a = pool.spawn(Vec3::ZERO).unwrap();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.free_len() + pool.active_len(), pool.capacity());
    }

    #[test]
    fn test_identity_is_stable_across_cycles() {
        let mut pool = pool(1);
        let first = pool.spawn(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        pool.get_mut(first).handle_mut().name = "tagged".into();
        pool.release(first);
        let second = pool.spawn(Vec3::new(0.0, 0.0, 9.0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(pool.get(second).handle().name, "tagged");
        assert_eq!(pool.get(second).handle().position.z, 9.0);
    }

    #[test]
    fn test_into_handles_hides_all() {
        let mut pool = pool(3);
        pool.spawn(Vec3::ZERO);
        let handles = pool.into_handles();
        assert_eq!(handles.len(), 3);
        assert!(handles.iter().all(|h| !h.active));
    }
}
