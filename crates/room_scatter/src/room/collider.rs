//! Physics-layer overlap queries used by the optional overlap predicate.
use glam::Vec3;

use crate::geometry::bounds::{Aabb, OrientedBox};

/// Bitmask of physics layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask with only `layer` set. Layers above 31 produce an empty mask.
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    #[inline]
    pub fn includes(self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Answers whether a box at a candidate pose would intersect existing physical objects.
pub trait OverlapQuery {
    /// True when `shape` overlaps any non-trigger collider on a layer in `mask`.
    fn check_box(&self, shape: &OrientedBox, mask: LayerMask) -> bool;
}

/// Axis-aligned collider on a physics layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub bounds: Aabb,
    pub layer: u8,
    /// Trigger-only volumes never block placement.
    pub is_trigger: bool,
}

impl Collider {
    pub fn solid(bounds: Aabb, layer: u8) -> Self {
        Self {
            bounds,
            layer,
            is_trigger: false,
        }
    }

    pub fn trigger(bounds: Aabb, layer: u8) -> Self {
        Self {
            bounds,
            layer,
            is_trigger: true,
        }
    }
}

/// Flat list of colliders, good enough for room-sized scenes.
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn push(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Adds a solid cube collider, e.g. for an object that was just placed.
    pub fn push_cube(&mut self, center: Vec3, size: f32, layer: u8) {
        self.push(Collider::solid(
            Aabb::from_center_size(center, Vec3::splat(size)),
            layer,
        ));
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}

impl OverlapQuery for ColliderSet {
    fn check_box(&self, shape: &OrientedBox, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .filter(|c| !c.is_trigger && mask.includes(c.layer))
            .any(|c| shape.intersects_aabb(&c.bounds))
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    fn query_box() -> OrientedBox {
        OrientedBox::new(Vec3::ZERO, Vec3::splat(0.5), Quat::IDENTITY)
    }

    #[test]
    fn triggers_and_other_layers_are_ignored() {
        let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let set = ColliderSet::new()
            .with_collider(Collider::trigger(bounds, 0))
            .with_collider(Collider::solid(bounds, 3));
        assert!(!set.check_box(&query_box(), LayerMask::layer(0)));
        assert!(set.check_box(&query_box(), LayerMask::layer(3)));
        assert!(set.check_box(&query_box(), LayerMask::ALL));
        assert!(!set.check_box(&query_box(), LayerMask::NONE));
    }

    #[test]
    fn distant_collider_does_not_overlap() {
        let mut set = ColliderSet::new();
        set.push_cube(Vec3::new(3.0, 0.0, 0.0), 1.0, 0);
        assert_eq!(set.len(), 1);
        assert!(!set.check_box(&query_box(), LayerMask::ALL));
    }

    #[test]
    fn layer_mask_bits() {
        assert!(LayerMask::layer(5).includes(5));
        assert!(!LayerMask::layer(5).includes(4));
        assert_eq!(LayerMask::layer(40), LayerMask::NONE);
    }
}
