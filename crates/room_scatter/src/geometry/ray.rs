//! Rays and ray intersection helpers.
use glam::Vec3;

use crate::geometry::bounds::Aabb;
use crate::geometry::SURFACE_EPSILON;

/// Half-line starting at `origin` along a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`. A zero direction yields a ray that hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to a one-sided plane. Only planes facing against the ray are hit.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = self.direction.dot(normal);
        if denom >= -1e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t > SURFACE_EPSILON).then_some(t)
    }

    /// Entry distance and entry-face normal for a box, using the slab method.
    ///
    /// Rays starting inside (or on the surface of) the box report no hit.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<(f32, Vec3)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = if inv >= 0.0 {
                ((lo - o) * inv, (hi - o) * inv)
            } else {
                ((hi - o) * inv, (lo - o) * inv)
            };

            if t0 > t_near {
                t_near = t0;
                let mut n = Vec3::ZERO;
                n[axis] = -d.signum();
                normal = n;
            }
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        (t_near > SURFACE_EPSILON).then_some((t_near, normal))
    }
}

/// Nearest surface hit reported by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}
