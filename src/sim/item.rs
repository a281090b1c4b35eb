//! Pooled items and the host-facing activation sink
//!
//! The streamers never create or destroy host entities after startup. They
//! only toggle visibility, move, and measure the handles a [`Prefab`] built.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::PARK_POSITION;

/// Host entity the streamers can show, hide, move and measure
pub trait Presentable {
    /// Make the entity visible and collidable (or hide it)
    fn set_active(&mut self, active: bool);
    /// Move the entity (x lateral, y up, z forward)
    fn set_position(&mut self, position: Vec3);
    /// Half of the entity's lateral extent, from its collision geometry
    fn half_width(&self) -> f32;
}

/// One interchangeable variant that can be instantiated into a host entity
pub trait Prefab {
    type Item: Presentable;

    fn instantiate(&self) -> Self::Item;
}

/// Stable index of an item inside its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A host handle plus the streaming state kept alongside it
#[derive(Debug, Clone)]
pub struct PoolItem<H> {
    handle: H,
    position: Vec3,
    half_width: f32,
    active: bool,
}

impl<H: Presentable> PoolItem<H> {
    /// Wrap a freshly instantiated handle, hidden and parked off-world
    pub fn new(mut handle: H) -> Self {
        handle.set_active(false);
        handle.set_position(PARK_POSITION);
        let half_width = handle.half_width();
        Self {
            handle,
            position: PARK_POSITION,
            half_width,
            active: false,
        }
    }

    /// Re-query the handle's half-width and cache it
    pub fn measure(&mut self) -> f32 {
        let half_width = self.handle.half_width();
        self.half_width = if half_width.is_finite() {
            half_width.max(0.0)
        } else {
            0.0
        };
        self.half_width
    }

    pub(crate) fn activate(&mut self, position: Vec3) {
        self.position = position;
        self.handle.set_position(position);
        self.handle.set_active(true);
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.handle.set_active(false);
        self.handle.set_position(PARK_POSITION);
        self.position = PARK_POSITION;
        self.active = false;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Cached half-width from the last [`measure`](Self::measure)
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub(crate) fn into_handle(mut self) -> H {
        if self.active {
            self.deactivate();
        }
        self.handle
    }
}

/// Headless stand-in for a host entity
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub half_width: f32,
    pub position: Vec3,
    pub active: bool,
}

impl Presentable for Marker {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn half_width(&self) -> f32 {
        self.half_width
    }
}

/// Catalogue entry producing [`Marker`]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrefab {
    pub name: String,
    #[serde(default)]
    pub half_width: f32,
}

impl MarkerPrefab {
    pub fn new(name: impl Into<String>, half_width: f32) -> Self {
        Self {
            name: name.into(),
            half_width,
        }
    }
}

impl Prefab for MarkerPrefab {
    type Item = Marker;

    fn instantiate(&self) -> Marker {
        Marker {
            name: self.name.clone(),
            half_width: self.half_width,
            position: Vec3::ZERO,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_parked_and_hidden() {
        let item = PoolItem::new(MarkerPrefab::new("Rock", 1.5).instantiate());
        assert!(!item.is_active());
        assert!(!item.handle().active);
        assert_eq!(item.handle().position, PARK_POSITION);
        assert_eq!(item.half_width(), 1.5);
    }

    #[test]
    fn test_activate_and_deactivate_drive_handle() {
        let mut item = PoolItem::new(MarkerPrefab::new("Tree", 1.0).instantiate());
        item.activate(Vec3::new(2.0, 0.0, 70.0));
        assert!(item.handle().active);
        assert_eq!(item.handle().position, Vec3::new(2.0, 0.0, 70.0));
        assert_eq!(item.position().z, 70.0);

        item.deactivate();
        assert!(!item.handle().active);
        assert_eq!(item.position(), PARK_POSITION);
    }

    #[test]
    fn test_measure_sanitizes_width() {
        let mut item = PoolItem::new(MarkerPrefab::new("Pond", 2.0).instantiate());
        item.handle_mut().half_width = 3.0;
        assert_eq!(item.measure(), 3.0);
        item.handle_mut().half_width = f32::NAN;
        assert_eq!(item.measure(), 0.0);
        item.handle_mut().half_width = -1.0;
        assert_eq!(item.measure(), 0.0);
    }

    #[test]
    fn test_into_handle_hides_active_item() {
        let mut item = PoolItem::new(MarkerPrefab::new("Rock", 1.0).instantiate());
        item.activate(Vec3::ZERO);
        let handle = item.into_handle();
        assert!(!handle.active);
    }
}
