//! Axis-aligned and oriented bounding boxes.
use glam::{Quat, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners, ordering each component.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box from its center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns a copy grown by `margin` on every side. Negative margins shrink the box
    /// but never invert it.
    pub fn inflated(&self, margin: f32) -> Self {
        let min = self.min - Vec3::splat(margin);
        let max = self.max + Vec3::splat(margin);
        let center = (min + max) * 0.5;
        Self {
            min: min.min(center),
            max: max.max(center),
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Box with an arbitrary rotation, used for overlap checks at a candidate pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl OrientedBox {
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            rotation,
        }
    }

    /// Local axes of the box in world space.
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::X,
            self.rotation * Vec3::Y,
            self.rotation * Vec3::Z,
        ]
    }

    /// Separating-axis overlap test against an axis-aligned box. Touching counts as overlap.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let world_axes = [Vec3::X, Vec3::Y, Vec3::Z];
        let box_axes = self.axes();
        let aabb_half = aabb.half_extents();
        let offset = self.center - aabb.center();

        let separated_on = |axis: Vec3| -> bool {
            if axis.length_squared() < 1e-10 {
                return false;
            }
            let ra = aabb_half.x * world_axes[0].dot(axis).abs()
                + aabb_half.y * world_axes[1].dot(axis).abs()
                + aabb_half.z * world_axes[2].dot(axis).abs();
            let rb = self.half_extents.x * box_axes[0].dot(axis).abs()
                + self.half_extents.y * box_axes[1].dot(axis).abs()
                + self.half_extents.z * box_axes[2].dot(axis).abs();
            offset.dot(axis).abs() > ra + rb
        };

        for axis in world_axes.iter().chain(box_axes.iter()) {
            if separated_on(*axis) {
                return false;
            }
        }
        for a in &world_axes {
            for b in &box_axes {
                if separated_on(a.cross(*b)) {
                    return false;
                }
            }
        }
        true
    }
}
