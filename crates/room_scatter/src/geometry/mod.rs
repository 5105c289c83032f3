//! Geometry primitives used by room providers and the placement engine.
//!
//! World space is right-handed with +Y up. Floor polygons live on the XZ plane and are
//! stored as [`glam::Vec2`] where `x` maps to world X and `y` maps to world Z.
use glam::{Vec2, Vec3};

pub mod bounds;
pub mod polygon;
pub mod ray;

/// Hits and containment tests closer than this are treated as touching the surface.
pub const SURFACE_EPSILON: f32 = 1e-4;

/// Projects a world point onto the floor plane.
#[inline]
pub fn to_xz(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Lifts a floor-plane point to world space at height `y`.
#[inline]
pub fn from_xz(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xz_projection_round_trips_height() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(to_xz(p), Vec2::new(1.0, 3.0));
        assert_eq!(from_xz(to_xz(p), 2.0), p);
    }
}
