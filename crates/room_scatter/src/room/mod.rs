//! Room geometry provider interface.
//!
//! The placement engine never looks at room meshes directly. It asks a [`RoomGeometry`]
//! for random surface samples and for point and ray queries. [`scanned::ScannedRoom`]
//! is a reference provider built from a floor polygon and anchor list; platform
//! integrations implement the trait over their own scene data.
use glam::Vec3;
use rand::RngCore;

use crate::geometry::ray::{Ray, RayHit};
use crate::room::labels::{LabelFilter, SceneLabels, SurfaceType};

pub mod collider;
pub mod labels;
pub mod scanned;

/// Distance from a wall below which the player is warned.
pub const DEFAULT_WALL_WARNING_DISTANCE: f32 = 0.5;

/// One random point on a room surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    /// Unit normal pointing away from the surface, into the room.
    pub normal: Vec3,
    pub label: SceneLabels,
}

/// Spatial queries over a scanned room.
///
/// Implementations must treat the room as immutable for the duration of a placement
/// call. `sample_surface` should be documented with its distribution; the reference
/// provider samples uniformly over the total area of eligible patches.
pub trait RoomGeometry {
    /// Draws a random point on a surface of one of the requested orientation classes,
    /// at least `min_radius` away from that surface's edges.
    ///
    /// Returns `None` when no surface of the requested classes passes the filter.
    fn sample_surface(
        &self,
        surface: SurfaceType,
        min_radius: f32,
        filter: LabelFilter,
        rng: &mut dyn RngCore,
    ) -> Option<SurfaceSample>;

    /// Whether `point` lies inside the room boundary, between floor and ceiling.
    fn is_position_in_room(&self, point: Vec3) -> bool;

    /// Whether `point` lies inside any furniture or clutter volume.
    fn is_position_in_scene_volume(&self, point: Vec3) -> bool;

    /// Nearest room surface hit along `ray` within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;

    /// Horizontal distance from `point` to the closest wall, if the provider knows its
    /// walls.
    fn distance_to_nearest_wall(&self, _point: Vec3) -> Option<f32> {
        None
    }

    /// Whether `point` is closer than `warning_distance` to a wall. Providers without
    /// wall data never report proximity.
    fn is_near_wall(&self, point: Vec3, warning_distance: f32) -> bool {
        self.distance_to_nearest_wall(point)
            .is_some_and(|d| d < warning_distance)
    }
}

impl<T: RoomGeometry + ?Sized> RoomGeometry for &T {
    fn sample_surface(
        &self,
        surface: SurfaceType,
        min_radius: f32,
        filter: LabelFilter,
        rng: &mut dyn RngCore,
    ) -> Option<SurfaceSample> {
        (**self).sample_surface(surface, min_radius, filter, rng)
    }

    fn is_position_in_room(&self, point: Vec3) -> bool {
        (**self).is_position_in_room(point)
    }

    fn is_position_in_scene_volume(&self, point: Vec3) -> bool {
        (**self).is_position_in_scene_volume(point)
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        (**self).raycast(ray, max_distance)
    }

    fn distance_to_nearest_wall(&self, point: Vec3) -> Option<f32> {
        (**self).distance_to_nearest_wall(point)
    }

    fn is_near_wall(&self, point: Vec3, warning_distance: f32) -> bool {
        (**self).is_near_wall(point, warning_distance)
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    // Top 24 bits fill the mantissa exactly, so the result never rounds up to 1.0.
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Generate a random float in `[lo, hi]`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rand01(rng)
}
