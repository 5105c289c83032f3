//! Object footprints and the offsets derived from them.
use glam::Vec3;

use crate::geometry::bounds::Aabb;
use crate::placement::FOOTPRINT_SKIN;

/// Axis-aligned bounds of an object in its own local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub min: Vec3,
    pub max: Vec3,
}

impl Footprint {
    /// Creates a footprint, lifting `max.y` to `min.y` when the vertical bounds are inverted.
    pub fn from_min_max(min: Vec3, mut max: Vec3) -> Self {
        if max.y < min.y {
            max.y = min.y;
        }
        Self { min, max }
    }

    /// Footprint of a box of `size` centered on the local origin.
    pub fn centered(size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::from_min_max(-half, half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Offsets and radii computed once per placement call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintOffsets {
    /// Distance along the normal that rests the object's bottom on the surface.
    pub base_offset: f32,
    /// Distance from the placed position to the footprint's vertical center.
    pub center_offset: f32,
    /// Horizontal clearance the surface sample must keep from patch edges.
    pub min_radius: f32,
    /// Local-space box tested by the overlap predicate, if a footprint exists.
    pub check_bounds: Option<Aabb>,
}

impl FootprintOffsets {
    /// Offsets for an object without bounds: a point resting on the surface.
    pub const ZERO: Self = Self {
        base_offset: 0.0,
        center_offset: 0.0,
        min_radius: 0.0,
        check_bounds: None,
    };

    pub fn compute(footprint: Option<&Footprint>, override_bounds: Option<f32>) -> Self {
        let Some(fp) = footprint else {
            return Self::ZERO;
        };
        // Literal or deserialized footprints skip the constructor clamp.
        let fp = Footprint::from_min_max(fp.min, fp.max);

        let min_radius = (-fp.min.x)
            .min(-fp.min.z)
            .min(fp.max.x)
            .min(fp.max.z)
            .max(0.0);

        let mut min = fp.min;
        let mut max = fp.max;
        min.y += FOOTPRINT_SKIN;
        if max.y < min.y {
            max.y = min.y;
        }
        let mut check_bounds = Aabb { min, max };

        if let Some(extent) = override_bounds.filter(|e| *e > 0.0) {
            check_bounds = Aabb::from_center_size(
                Vec3::new(0.0, FOOTPRINT_SKIN, 0.0),
                Vec3::new(extent * 2.0, FOOTPRINT_SKIN * 2.0, extent * 2.0),
            );
        }

        Self {
            base_offset: -fp.min.y,
            center_offset: fp.center().y,
            min_radius,
            check_bounds: Some(check_bounds),
        }
    }
}
