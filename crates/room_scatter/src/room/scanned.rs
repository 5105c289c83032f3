//! Reference room provider built from a floor polygon and a list of scene anchors.
//!
//! The room is an extruded polygon: a floor at `floor_y`, a ceiling at `ceiling_y` and one
//! wall per polygon edge. Furniture and wall decorations are added as [`SceneAnchor`]s.
//! Surface sampling is uniform over the usable area of the eligible patches. For the
//! floor and ceiling the usable area is estimated as the polygon area minus a border
//! of `perimeter * min_radius`.
use glam::{Vec2, Vec3};
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::bounds::Aabb;
use crate::geometry::ray::{Ray, RayHit};
use crate::geometry::{from_xz, polygon, to_xz, SURFACE_EPSILON};
use crate::room::labels::{LabelFilter, SceneLabels, SurfaceType};
use crate::room::{rand01, rand_range, RoomGeometry, SurfaceSample};

/// Rejection attempts when drawing a point inside a floor or ceiling polygon.
const POLYGON_SAMPLE_ATTEMPTS: usize = 64;

/// Furniture, clutter or a flat decoration registered in the room scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SceneAnchor {
    /// Solid volume. Its top face is an upward-facing surface with the anchor's label and
    /// its interior is an obstruction volume.
    Volume { label: SceneLabels, bounds: Aabb },
    /// Flat rectangle such as a window frame or wall art.
    Plane {
        label: SceneLabels,
        center: Vec3,
        normal: Vec3,
        /// Full width and height of the rectangle.
        size: Vec2,
    },
}

impl SceneAnchor {
    pub fn volume(label: SceneLabels, bounds: Aabb) -> Self {
        Self::Volume { label, bounds }
    }

    pub fn plane(label: SceneLabels, center: Vec3, normal: Vec3, size: Vec2) -> Self {
        Self::Plane {
            label,
            center,
            normal: normal.normalize_or_zero(),
            size,
        }
    }

    pub fn label(&self) -> SceneLabels {
        match self {
            Self::Volume { label, .. } | Self::Plane { label, .. } => *label,
        }
    }

    /// Reference point of the anchor: the box center or the plane center.
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Volume { bounds, .. } => bounds.center(),
            Self::Plane { center, .. } => *center,
        }
    }
}

#[derive(Debug, Clone)]
enum PatchShape {
    /// The room's floor polygon lifted to `height`.
    Polygon { height: f32, perimeter: f32 },
    /// Rectangle spanned by unit axes `u`, `v` around `center`.
    Rect {
        center: Vec3,
        u: Vec3,
        v: Vec3,
        half: Vec2,
    },
}

#[derive(Debug, Clone)]
struct SurfacePatch {
    label: SceneLabels,
    surface: SurfaceType,
    normal: Vec3,
    area: f32,
    shape: PatchShape,
    /// Volume tops are hit through the anchor box instead.
    raycast: bool,
}

impl SurfacePatch {
    fn rect(label: SceneLabels, center: Vec3, normal: Vec3, u: Vec3, half: Vec2) -> Self {
        let v = normal.cross(u).normalize_or_zero();
        Self {
            label,
            surface: SurfaceType::classify(normal),
            normal,
            area: 4.0 * half.x * half.y,
            shape: PatchShape::Rect { center, u, v, half },
            raycast: true,
        }
    }

    /// Usable area once a border of `min_radius` is reserved along the edges.
    fn usable_area(&self, min_radius: f32) -> f32 {
        match &self.shape {
            PatchShape::Rect { half, .. } => {
                let w = (half.x - min_radius).max(0.0);
                let h = (half.y - min_radius).max(0.0);
                4.0 * w * h
            }
            PatchShape::Polygon { perimeter, .. } => {
                (self.area - perimeter * min_radius).max(0.0)
            }
        }
    }
}

/// Room described by an extruded floor polygon plus anchors.
#[derive(Debug, Clone)]
pub struct ScannedRoom {
    floor: Vec<Vec2>,
    floor_y: f32,
    ceiling_y: f32,
    anchors: Vec<SceneAnchor>,
    patches: Vec<SurfacePatch>,
}

impl ScannedRoom {
    /// Creates a room from a simple floor polygon on the XZ plane.
    ///
    /// The winding is normalized so wall normals always point into the room.
    pub fn try_new(mut floor: Vec<Vec2>, floor_y: f32, ceiling_y: f32) -> Result<Self> {
        if floor.len() < 3 {
            return Err(Error::InvalidConfig(
                "floor polygon needs at least 3 vertices".into(),
            ));
        }
        if polygon::area(&floor) <= f32::EPSILON {
            return Err(Error::InvalidConfig("floor polygon has no area".into()));
        }
        if ceiling_y <= floor_y {
            return Err(Error::InvalidConfig(
                "ceiling must be above the floor".into(),
            ));
        }
        if polygon::signed_area(&floor) < 0.0 {
            floor.reverse();
        }

        let mut room = Self {
            floor,
            floor_y,
            ceiling_y,
            anchors: Vec::new(),
            patches: Vec::new(),
        };
        room.rebuild_patches();
        Ok(room)
    }

    /// Axis-aligned box room centered on the origin with its floor at `y = 0`.
    pub fn rectangular(width: f32, depth: f32, height: f32) -> Result<Self> {
        let hw = width * 0.5;
        let hd = depth * 0.5;
        Self::try_new(
            vec![
                Vec2::new(-hw, -hd),
                Vec2::new(hw, -hd),
                Vec2::new(hw, hd),
                Vec2::new(-hw, hd),
            ],
            0.0,
            height,
        )
    }

    /// Adds an anchor and returns the room.
    pub fn with_anchor(mut self, anchor: SceneAnchor) -> Self {
        self.add_anchor(anchor);
        self
    }

    pub fn add_anchor(&mut self, anchor: SceneAnchor) {
        self.patches.extend(anchor_patch(&anchor));
        self.anchors.push(anchor);
    }

    pub fn floor_polygon(&self) -> &[Vec2] {
        &self.floor
    }

    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    pub fn ceiling_y(&self) -> f32 {
        self.ceiling_y
    }

    pub fn anchors(&self) -> &[SceneAnchor] {
        &self.anchors
    }

    /// Anchor closest to `point` among those whose label passes `filter`.
    pub fn nearest_anchor(&self, point: Vec3, filter: LabelFilter) -> Option<&SceneAnchor> {
        self.anchors
            .iter()
            .filter(|a| filter.passes(a.label()))
            .min_by(|a, b| {
                a.position()
                    .distance_squared(point)
                    .total_cmp(&b.position().distance_squared(point))
            })
    }

    /// `point` dropped straight down (or up) onto the floor plane.
    pub fn floor_position(&self, point: Vec3) -> Vec3 {
        Vec3::new(point.x, self.floor_y, point.z)
    }

    /// Total area of the patches of the given classes that pass `filter`.
    pub fn surface_area(&self, surface: SurfaceType, filter: LabelFilter) -> f32 {
        self.patches
            .iter()
            .filter(|p| surface.intersects(p.surface) && filter.passes(p.label))
            .map(|p| p.area)
            .sum()
    }

    fn rebuild_patches(&mut self) {
        let floor_area = polygon::area(&self.floor);
        let perimeter = polygon::perimeter(&self.floor);
        let mut patches = vec![
            SurfacePatch {
                label: SceneLabels::FLOOR,
                surface: SurfaceType::FACING_UP,
                normal: Vec3::Y,
                area: floor_area,
                shape: PatchShape::Polygon {
                    height: self.floor_y,
                    perimeter,
                },
                raycast: true,
            },
            SurfacePatch {
                label: SceneLabels::CEILING,
                surface: SurfaceType::FACING_DOWN,
                normal: Vec3::NEG_Y,
                area: floor_area,
                shape: PatchShape::Polygon {
                    height: self.ceiling_y,
                    perimeter,
                },
                raycast: true,
            },
        ];

        let height = self.ceiling_y - self.floor_y;
        let mid_y = (self.floor_y + self.ceiling_y) * 0.5;
        for (a, b) in polygon::edges(&self.floor) {
            let edge = b - a;
            let len = edge.length();
            if len <= f32::EPSILON {
                continue;
            }
            let dir = edge / len;
            // Counter-clockwise winding keeps the interior on the left of each edge.
            let inward = Vec3::new(-dir.y, 0.0, dir.x);
            let center = from_xz((a + b) * 0.5, mid_y);
            let u = Vec3::new(dir.x, 0.0, dir.y);
            patches.push(SurfacePatch::rect(
                SceneLabels::WALL_FACE,
                center,
                inward,
                u,
                Vec2::new(len * 0.5, height * 0.5),
            ));
        }

        patches.extend(self.anchors.iter().filter_map(anchor_patch));
        self.patches = patches;
    }

    fn sample_patch(
        &self,
        patch: &SurfacePatch,
        min_radius: f32,
        rng: &mut dyn RngCore,
    ) -> Option<Vec3> {
        match &patch.shape {
            PatchShape::Rect { center, u, v, half } => {
                let hx = (half.x - min_radius).max(0.0);
                let hy = (half.y - min_radius).max(0.0);
                let a = rand_range(rng, -hx, hx);
                let b = rand_range(rng, -hy, hy);
                Some(*center + *u * a + *v * b)
            }
            PatchShape::Polygon { height, .. } => {
                let (lo, hi) = polygon::bounding_rect(&self.floor);
                for _ in 0..POLYGON_SAMPLE_ATTEMPTS {
                    let p = Vec2::new(rand_range(rng, lo.x, hi.x), rand_range(rng, lo.y, hi.y));
                    if polygon::contains_point(&self.floor, p)
                        && polygon::distance_to_boundary(&self.floor, p) >= min_radius
                    {
                        return Some(from_xz(p, *height));
                    }
                }
                None
            }
        }
    }
}

fn anchor_patch(anchor: &SceneAnchor) -> Option<SurfacePatch> {
    match anchor {
        SceneAnchor::Volume { label, bounds } => {
            let size = bounds.size();
            if size.x <= 0.0 || size.z <= 0.0 {
                return None;
            }
            let top = Vec3::new(bounds.center().x, bounds.max.y, bounds.center().z);
            let mut patch =
                SurfacePatch::rect(*label, top, Vec3::Y, Vec3::X, Vec2::new(size.x, size.z) * 0.5);
            patch.raycast = false;
            Some(patch)
        }
        SceneAnchor::Plane {
            label,
            center,
            normal,
            size,
        } => {
            if *normal == Vec3::ZERO || size.x <= 0.0 || size.y <= 0.0 {
                return None;
            }
            // Vertical planes keep their height along world up; horizontal ones use world X.
            let u = if SurfaceType::classify(*normal) == SurfaceType::VERTICAL {
                Vec3::Y.cross(*normal).normalize_or_zero()
            } else {
                Vec3::X
            };
            Some(SurfacePatch::rect(*label, *center, *normal, u, *size * 0.5))
        }
    }
}

impl RoomGeometry for ScannedRoom {
    fn sample_surface(
        &self,
        surface: SurfaceType,
        min_radius: f32,
        filter: LabelFilter,
        rng: &mut dyn RngCore,
    ) -> Option<SurfaceSample> {
        let min_radius = min_radius.max(0.0);
        let eligible: Vec<(&SurfacePatch, f32)> = self
            .patches
            .iter()
            .filter(|p| surface.intersects(p.surface) && filter.passes(p.label))
            .map(|p| (p, p.usable_area(min_radius)))
            .filter(|(_, area)| *area > 0.0)
            .collect();
        let total: f32 = eligible.iter().map(|(_, area)| area).sum();
        if eligible.is_empty() || total <= 0.0 {
            debug!(
                "No eligible patches for {:?} with min radius {}.",
                surface, min_radius
            );
            return None;
        }

        for _ in 0..POLYGON_SAMPLE_ATTEMPTS {
            let mut roll = rand01(rng) * total;
            let mut chosen = eligible[eligible.len() - 1].0;
            for (patch, area) in &eligible {
                roll -= area;
                if roll <= 0.0 {
                    chosen = *patch;
                    break;
                }
            }
            if let Some(position) = self.sample_patch(chosen, min_radius, rng) {
                return Some(SurfaceSample {
                    position,
                    normal: chosen.normal,
                    label: chosen.label,
                });
            }
        }
        None
    }

    fn is_position_in_room(&self, point: Vec3) -> bool {
        point.y >= self.floor_y - SURFACE_EPSILON
            && point.y <= self.ceiling_y + SURFACE_EPSILON
            && polygon::contains_point(&self.floor, to_xz(point))
    }

    fn is_position_in_scene_volume(&self, point: Vec3) -> bool {
        self.anchors.iter().any(|anchor| match anchor {
            // Points resting on a face are outside; the top face is a valid surface.
            SceneAnchor::Volume { bounds, .. } => {
                bounds.inflated(-SURFACE_EPSILON).contains_point(point)
            }
            SceneAnchor::Plane { .. } => false,
        })
    }

    fn distance_to_nearest_wall(&self, point: Vec3) -> Option<f32> {
        Some(polygon::distance_to_boundary(&self.floor, to_xz(point)))
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        let mut consider = |distance: f32, normal: Vec3| {
            if distance <= max_distance && best.is_none_or(|b| distance < b.distance) {
                best = Some(RayHit {
                    point: ray.at(distance),
                    normal,
                    distance,
                });
            }
        };

        for patch in self.patches.iter().filter(|p| p.raycast) {
            match &patch.shape {
                PatchShape::Polygon { height, .. } => {
                    let plane_point = Vec3::new(0.0, *height, 0.0);
                    if let Some(t) = ray.intersect_plane(plane_point, patch.normal) {
                        if polygon::contains_point(&self.floor, to_xz(ray.at(t))) {
                            consider(t, patch.normal);
                        }
                    }
                }
                PatchShape::Rect { center, u, v, half } => {
                    if let Some(t) = ray.intersect_plane(*center, patch.normal) {
                        let local = ray.at(t) - *center;
                        if local.dot(*u).abs() <= half.x && local.dot(*v).abs() <= half.y {
                            consider(t, patch.normal);
                        }
                    }
                }
            }
        }

        for anchor in &self.anchors {
            if let SceneAnchor::Volume { bounds, .. } = anchor {
                if let Some((t, normal)) = ray.intersect_aabb(bounds) {
                    consider(t, normal);
                }
            }
        }

        best
    }
}
