//! Constrained placement of objects on room surfaces.
//!
//! Two modes share the same validity predicates:
//! - first-valid ([`engine::PlacementEngine::try_place`]): accept the first candidate that
//!   passes every predicate, used for obstacles such as lasers.
//! - farthest-point ([`engine::PlacementEngine::try_place_farthest`]): rank a fixed number of
//!   valid candidates by distance from a reference point and keep the farthest, used for
//!   the objective.
use glam::{Quat, Vec3};

pub mod engine;
pub mod events;
pub mod footprint;
pub mod request;
pub mod validity;

pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
pub const DEFAULT_SURFACE_CLEARANCE: f32 = 0.1;
/// Skin lifted off the surface before the overlap box is tested.
pub const FOOTPRINT_SKIN: f32 = 0.01;
pub const DEFAULT_MIN_PLAYER_DISTANCE: f32 = 0.5;

/// Identifier of an entity created by the placement engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnId(pub u64);

/// World position and rotation of a placed object.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotation that maps the canonical up axis onto `normal` along the shortest arc.
    pub fn up_to(normal: Vec3) -> Quat {
        let n = normal.normalize_or_zero();
        if n == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(Vec3::Y, n)
    }

    /// The local up axis expressed in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transforms a point from the object's local frame to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_to_maps_up_onto_normal() {
        for normal in [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(0.3, -0.2, 0.9).normalize(),
        ] {
            let rotated = Pose::up_to(normal) * Vec3::Y;
            assert!((rotated.length() - 1.0).abs() < 1e-5);
            assert!((rotated.dot(normal) - 1.0).abs() < 1e-5, "normal {normal:?}");
        }
    }

    #[test]
    fn zero_normal_keeps_identity() {
        assert_eq!(Pose::up_to(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn transform_point_applies_rotation() {
        let pose = Pose::new(Vec3::new(0.0, 2.5, 0.0), Pose::up_to(Vec3::NEG_Y));
        let p = pose.transform_point(Vec3::new(0.0, 0.5, 0.0));
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        assert!((pose.up() - Vec3::NEG_Y).length() < 1e-5);
    }
}
