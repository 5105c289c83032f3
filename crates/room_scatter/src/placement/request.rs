//! Placement requests and farthest-point search settings.
use glam::Vec3;

use crate::error::{Error, Result};
use crate::geometry::to_xz;
use crate::placement::footprint::Footprint;
use crate::placement::{DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_PLAYER_DISTANCE, DEFAULT_SURFACE_CLEARANCE};
use crate::room::collider::LayerMask;
use crate::room::labels::{LabelFilter, SceneLabels, SurfaceType};

/// Where an object may be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnLocation {
    /// Any of the three classes below.
    #[default]
    AnySurface,
    /// Walls, windows, wall art, doors.
    VerticalSurfaces,
    /// Floor and the tops of tables, beds, couches.
    OnTopOfSurfaces,
    /// Ceiling-like surfaces facing down.
    HangingDown,
}

impl SpawnLocation {
    pub fn surface_type(self) -> SurfaceType {
        match self {
            Self::AnySurface => {
                SurfaceType::FACING_UP | SurfaceType::VERTICAL | SurfaceType::FACING_DOWN
            }
            Self::VerticalSurfaces => SurfaceType::VERTICAL,
            Self::OnTopOfSurfaces => SurfaceType::FACING_UP,
            Self::HangingDown => SurfaceType::FACING_DOWN,
        }
    }
}

/// Description of an object that can be instantiated by the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTemplate {
    pub name: String,
    /// Local-space bounds; `None` places the object as a point.
    pub footprint: Option<Footprint>,
}

impl ObjectTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            footprint: None,
        }
    }

    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = Some(footprint);
        self
    }

    /// Sets the footprint from local-space corners.
    pub fn with_bounds(self, min: Vec3, max: Vec3) -> Self {
        self.with_footprint(Footprint::from_min_max(min, max))
    }
}

/// Per-call placement constraints.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementRequest {
    /// Orientation classes eligible as the sampling domain.
    pub surface: SurfaceType,
    /// Semantic labels eligible as the sampling domain.
    pub labels: LabelFilter,
    /// Raw surface samples drawn before giving up.
    pub max_iterations: u32,
    /// Free distance required along the surface normal.
    pub surface_clearance_distance: f32,
    /// Test the footprint box against physics colliders.
    pub check_overlaps: bool,
    /// Half-extent of a square overlap box replacing the footprint box.
    pub override_bounds: Option<f32>,
    /// Layers checked by the overlap test.
    pub layer_mask: LayerMask,
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self {
            surface: SpawnLocation::AnySurface.surface_type(),
            labels: LabelFilter::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            surface_clearance_distance: DEFAULT_SURFACE_CLEARANCE,
            check_overlaps: false,
            override_bounds: None,
            layer_mask: LayerMask::ALL,
        }
    }
}

impl PlacementRequest {
    /// Creates a request for the given location with default constraints.
    pub fn new(location: SpawnLocation) -> Self {
        Self {
            surface: location.surface_type(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: SpawnLocation) -> Self {
        self.surface = location.surface_type();
        self
    }

    /// Sets the orientation classes directly.
    pub fn with_surface(mut self, surface: SurfaceType) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_labels(mut self, labels: SceneLabels) -> Self {
        self.labels = LabelFilter::new(labels);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_surface_clearance(mut self, distance: f32) -> Self {
        self.surface_clearance_distance = distance;
        self
    }

    /// Enables the overlap test against `layer_mask`.
    pub fn with_overlap_check(mut self, layer_mask: LayerMask) -> Self {
        self.check_overlaps = true;
        self.layer_mask = layer_mask;
        self
    }

    /// Replaces the footprint box used by the overlap test. Non-positive values are ignored.
    pub fn with_override_bounds(mut self, half_extent: f32) -> Self {
        self.override_bounds = (half_extent > 0.0).then_some(half_extent);
        self
    }

    /// Validates the request, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be > 0".into()));
        }
        if !(self.surface_clearance_distance >= 0.0) || !self.surface_clearance_distance.is_finite()
        {
            return Err(Error::InvalidConfig(
                "surface_clearance_distance must be finite and >= 0".into(),
            ));
        }
        if self.surface.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one surface class must be requested".into(),
            ));
        }
        Ok(())
    }
}

/// How distance from the player reference point is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    #[default]
    Full3d,
    /// Ignores height, comparing positions projected onto the floor plane.
    Horizontal,
}

impl DistanceMetric {
    pub fn distance(self, a: Vec3, b: Vec3) -> f32 {
        match self {
            Self::Full3d => a.distance(b),
            Self::Horizontal => to_xz(a).distance(to_xz(b)),
        }
    }
}

/// Settings for the farthest-point objective search.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FarthestSearch {
    /// Point the objective should be far from, usually the player's head.
    pub reference: Vec3,
    pub metric: DistanceMetric,
    /// Valid candidates to rank before committing to the best one.
    pub search_budget: u32,
    /// Candidates closer than this to `reference` are rejected.
    pub min_distance: f32,
    /// Return the best candidate seen when raw iterations run out before the search
    /// budget is filled, instead of failing.
    pub best_effort: bool,
}

impl FarthestSearch {
    pub fn new(reference: Vec3, search_budget: u32) -> Self {
        Self {
            reference,
            metric: DistanceMetric::Full3d,
            search_budget,
            min_distance: DEFAULT_MIN_PLAYER_DISTANCE,
            best_effort: false,
        }
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }

    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_budget == 0 {
            return Err(Error::InvalidConfig("search_budget must be > 0".into()));
        }
        if !(self.min_distance >= 0.0) || !self.min_distance.is_finite() {
            return Err(Error::InvalidConfig(
                "min_distance must be finite and >= 0".into(),
            ));
        }
        if !self.reference.is_finite() {
            return Err(Error::InvalidConfig("reference point must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_map_to_surface_bits() {
        assert_eq!(SpawnLocation::AnySurface.surface_type(), SurfaceType::ALL);
        assert_eq!(
            SpawnLocation::HangingDown.surface_type(),
            SurfaceType::FACING_DOWN
        );
        assert_eq!(
            PlacementRequest::new(SpawnLocation::VerticalSurfaces).surface,
            SurfaceType::VERTICAL
        );
    }

    #[test]
    fn defaults_match_component_defaults() {
        let req = PlacementRequest::default();
        assert_eq!(req.max_iterations, 1000);
        assert_eq!(req.surface_clearance_distance, 0.1);
        assert!(!req.check_overlaps);
        assert_eq!(req.override_bounds, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_requests() {
        let base = PlacementRequest::new(SpawnLocation::OnTopOfSurfaces);
        assert!(base.clone().with_max_iterations(0).validate().is_err());
        assert!(base.clone().with_surface_clearance(-0.1).validate().is_err());
        assert!(base.clone().with_surface_clearance(f32::NAN).validate().is_err());
        assert!(base.with_surface(SurfaceType::NONE).validate().is_err());
    }

    #[test]
    fn override_bounds_ignores_non_positive() {
        let req = PlacementRequest::default().with_override_bounds(-1.0);
        assert_eq!(req.override_bounds, None);
        let req = req.with_override_bounds(0.25);
        assert_eq!(req.override_bounds, Some(0.25));
    }

    #[test]
    fn distance_metrics() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert!((DistanceMetric::Horizontal.distance(a, b) - 5.0).abs() < 1e-5);
        assert!(DistanceMetric::Full3d.distance(a, b) > 10.0);
    }

    #[test]
    fn farthest_search_validation() {
        assert!(FarthestSearch::new(Vec3::ZERO, 0).validate().is_err());
        assert!(FarthestSearch::new(Vec3::ZERO, 20).validate().is_ok());
        assert!(FarthestSearch::new(Vec3::ZERO, 20)
            .with_min_distance(-1.0)
            .validate()
            .is_err());
        assert!(FarthestSearch::new(Vec3::NAN, 20).validate().is_err());
    }
}
