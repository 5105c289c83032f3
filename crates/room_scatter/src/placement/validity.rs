//! Validity predicates evaluated for every sampled candidate.
//!
//! Each predicate is pure given the room, the candidate and the request. They are
//! composed by [`validate_candidate`] in a fixed order: interior, scene volumes,
//! surface clearance and the optional overlap test. Farthest-point search adds
//! [`is_far_enough_from`] on top.
use glam::{Quat, Vec3};

use crate::geometry::bounds::OrientedBox;
use crate::geometry::ray::Ray;
use crate::placement::footprint::FootprintOffsets;
use crate::placement::request::{DistanceMetric, PlacementRequest};
use crate::placement::Pose;
use crate::room::collider::{LayerMask, OverlapQuery};
use crate::room::{RoomGeometry, SurfaceSample};

/// Why a candidate was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    OutsideRoom,
    InsideSceneVolume,
    Obstructed,
    Overlapping,
    TooCloseToPlayer,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OutsideRoom => "outside room",
            Self::InsideSceneVolume => "inside scene volume",
            Self::Obstructed => "surface obstructed",
            Self::Overlapping => "overlaps collider",
            Self::TooCloseToPlayer => "too close to player",
        }
    }
}

/// A surface sample turned into a prospective pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Raw point returned by the room provider.
    pub surface_point: Vec3,
    /// Surface normal at the raw point.
    pub surface_normal: Vec3,
    /// Object position after the base offset.
    pub position: Vec3,
    /// Footprint center used by the interior and volume tests.
    pub center: Vec3,
    /// Normal the object's up axis is aligned to.
    pub facing: Vec3,
    pub rotation: Quat,
}

impl Candidate {
    /// Builds a candidate from a sample. With `invert_facing` the object's up axis points
    /// into the surface instead of away from it.
    pub fn from_sample(sample: &SurfaceSample, offsets: &FootprintOffsets, invert_facing: bool) -> Self {
        let normal = sample.normal;
        let position = sample.position + normal * offsets.base_offset;
        let center = position + normal * offsets.center_offset;
        let facing = if invert_facing { -normal } else { normal };
        Self {
            surface_point: sample.position,
            surface_normal: normal,
            position,
            center,
            facing,
            rotation: Pose::up_to(facing),
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// The candidate's footprint center lies inside the room boundary.
pub fn is_inside_room(room: &dyn RoomGeometry, candidate: &Candidate) -> bool {
    room.is_position_in_room(candidate.center)
}

/// The candidate's footprint center is not inside furniture or clutter.
pub fn is_clear_of_volumes(room: &dyn RoomGeometry, candidate: &Candidate) -> bool {
    !room.is_position_in_scene_volume(candidate.center)
}

/// Nothing blocks the raw surface point along its normal within `distance`.
pub fn has_surface_clearance(room: &dyn RoomGeometry, candidate: &Candidate, distance: f32) -> bool {
    if distance <= 0.0 {
        return true;
    }
    let ray = Ray::new(candidate.surface_point, candidate.surface_normal);
    room.raycast(&ray, distance).is_none()
}

/// Oriented box tested by the overlap predicate at the candidate pose.
pub fn overlap_box(candidate: &Candidate, offsets: &FootprintOffsets) -> Option<OrientedBox> {
    offsets.check_bounds.map(|bounds| {
        OrientedBox::new(
            candidate.position + candidate.rotation * bounds.center(),
            bounds.half_extents(),
            candidate.rotation,
        )
    })
}

/// The inflated footprint box does not intersect solid colliders on `mask`.
pub fn is_free_of_overlaps(
    overlaps: &dyn OverlapQuery,
    candidate: &Candidate,
    offsets: &FootprintOffsets,
    mask: LayerMask,
) -> bool {
    match overlap_box(candidate, offsets) {
        Some(shape) => !overlaps.check_box(&shape, mask),
        None => true,
    }
}

/// The candidate is at least `min_distance` from `reference` under `metric`.
pub fn is_far_enough_from(
    candidate: &Candidate,
    reference: Vec3,
    metric: DistanceMetric,
    min_distance: f32,
) -> bool {
    metric.distance(reference, candidate.position) >= min_distance
}

/// Runs the shared predicates in order and reports the first failure.
///
/// The overlap test only runs when the request enables it, a footprint exists and an
/// overlap query is available.
pub fn validate_candidate(
    room: &dyn RoomGeometry,
    overlaps: Option<&dyn OverlapQuery>,
    candidate: &Candidate,
    request: &PlacementRequest,
    offsets: &FootprintOffsets,
) -> Result<(), Rejection> {
    if !is_inside_room(room, candidate) {
        return Err(Rejection::OutsideRoom);
    }
    if !is_clear_of_volumes(room, candidate) {
        return Err(Rejection::InsideSceneVolume);
    }
    if !has_surface_clearance(room, candidate, request.surface_clearance_distance) {
        return Err(Rejection::Obstructed);
    }
    if request.check_overlaps {
        if let Some(query) = overlaps {
            if !is_free_of_overlaps(query, candidate, offsets, request.layer_mask) {
                return Err(Rejection::Overlapping);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounds::Aabb;
    use crate::placement::footprint::Footprint;
    use crate::placement::request::SpawnLocation;
    use crate::room::collider::{Collider, ColliderSet};
    use crate::room::labels::SceneLabels;
    use crate::room::scanned::{SceneAnchor, ScannedRoom};

    fn room() -> ScannedRoom {
        ScannedRoom::rectangular(4.0, 4.0, 2.5)
            .expect("room")
            .with_anchor(SceneAnchor::volume(
                SceneLabels::TABLE,
                Aabb::new(Vec3::new(0.5, 0.0, 0.5), Vec3::new(1.5, 0.75, 1.5)),
            ))
    }

    fn sample(position: Vec3, normal: Vec3) -> SurfaceSample {
        SurfaceSample {
            position,
            normal,
            label: SceneLabels::FLOOR,
        }
    }

    fn cube_offsets() -> FootprintOffsets {
        FootprintOffsets::compute(Some(&Footprint::centered(Vec3::splat(0.2))), None)
    }

    #[test]
    fn candidate_applies_offsets_along_normal() {
        let c = Candidate::from_sample(
            &sample(Vec3::new(0.0, 2.5, 0.0), Vec3::NEG_Y),
            &cube_offsets(),
            false,
        );
        assert!((c.position.y - 2.4).abs() < 1e-6);
        assert_eq!(c.center, c.position);
        assert!(((c.rotation * Vec3::Y) - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn inverted_facing_keeps_offsets_but_flips_rotation() {
        let c = Candidate::from_sample(&sample(Vec3::ZERO, Vec3::Y), &cube_offsets(), true);
        assert!((c.position.y - 0.1).abs() < 1e-6);
        assert_eq!(c.facing, Vec3::NEG_Y);
        assert!(((c.rotation * Vec3::Y) - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn predicates_reject_in_order() {
        let room = room();
        let req = PlacementRequest::new(SpawnLocation::OnTopOfSurfaces);
        let off = cube_offsets();

        let outside = Candidate::from_sample(&sample(Vec3::new(3.0, 0.0, 0.0), Vec3::Y), &off, false);
        assert_eq!(
            validate_candidate(&room, None, &outside, &req, &off),
            Err(Rejection::OutsideRoom)
        );

        // Floor point under the table: center sits inside the volume.
        let under = Candidate::from_sample(&sample(Vec3::new(1.0, 0.0, 1.0), Vec3::Y), &off, false);
        assert_eq!(
            validate_candidate(&room, None, &under, &req, &off),
            Err(Rejection::InsideSceneVolume)
        );

        // Floor point away from the table.
        let clear = Candidate::from_sample(&sample(Vec3::new(-1.0, 0.0, -1.0), Vec3::Y), &off, false);
        assert_eq!(validate_candidate(&room, None, &clear, &req, &off), Ok(()));

        // Long clearance from the floor reaches the ceiling.
        let tall = req.clone().with_surface_clearance(3.0);
        assert_eq!(
            validate_candidate(&room, None, &clear, &tall, &off),
            Err(Rejection::Obstructed)
        );
    }

    #[test]
    fn overlap_runs_only_when_enabled() {
        let room = room();
        let off = cube_offsets();
        let colliders = ColliderSet::new().with_collider(Collider::solid(
            Aabb::from_center_size(Vec3::new(-1.0, 0.1, -1.0), Vec3::splat(0.3)),
            2,
        ));
        let c = Candidate::from_sample(&sample(Vec3::new(-1.0, 0.0, -1.0), Vec3::Y), &off, false);

        let plain = PlacementRequest::new(SpawnLocation::OnTopOfSurfaces);
        assert_eq!(validate_candidate(&room, Some(&colliders), &c, &plain, &off), Ok(()));

        let checked = plain.clone().with_overlap_check(LayerMask::layer(2));
        assert_eq!(
            validate_candidate(&room, Some(&colliders), &c, &checked, &off),
            Err(Rejection::Overlapping)
        );

        let other_layer = plain.with_overlap_check(LayerMask::layer(1));
        assert_eq!(
            validate_candidate(&room, Some(&colliders), &c, &other_layer, &off),
            Ok(())
        );

        assert!(is_free_of_overlaps(&colliders, &c, &FootprintOffsets::ZERO, LayerMask::ALL));
    }

    #[test]
    fn player_distance_metrics_differ() {
        let off = FootprintOffsets::ZERO;
        let c = Candidate::from_sample(&sample(Vec3::new(0.0, 2.5, 0.0), Vec3::NEG_Y), &off, false);
        let head = Vec3::new(0.3, 1.6, 0.0);
        assert!(is_far_enough_from(&c, head, DistanceMetric::Full3d, 0.5));
        assert!(!is_far_enough_from(&c, head, DistanceMetric::Horizontal, 0.5));
    }
}
