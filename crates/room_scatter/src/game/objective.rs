//! The objective: a single object kept as far from the player as the room allows.
use glam::Vec3;
use rand::RngCore;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::placement::engine::{Placement, PlacementEngine, PlacementScene, PlacementTarget};
use crate::placement::request::{DistanceMetric, FarthestSearch, ObjectTemplate, PlacementRequest};
use crate::placement::{SpawnId, DEFAULT_MIN_PLAYER_DISTANCE};

/// Valid candidates ranked per objective placement.
pub const DEFAULT_SEARCH_BUDGET: u32 = 20;

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectiveSettings {
    pub search_budget: u32,
    pub metric: DistanceMetric,
    pub min_distance: f32,
    pub best_effort: bool,
    /// Base constraints. The surface class is always upward facing.
    pub request: PlacementRequest,
}

impl Default for ObjectiveSettings {
    fn default() -> Self {
        Self {
            search_budget: DEFAULT_SEARCH_BUDGET,
            metric: DistanceMetric::Full3d,
            min_distance: DEFAULT_MIN_PLAYER_DISTANCE,
            best_effort: false,
            request: PlacementRequest::default(),
        }
    }
}

impl ObjectiveSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_budget(mut self, budget: u32) -> Self {
        self.search_budget = budget;
        self
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

    pub fn with_request(mut self, request: PlacementRequest) -> Self {
        self.request = request;
        self
    }

    /// Search settings for a player standing at `reference`.
    pub fn search(&self, reference: Vec3) -> FarthestSearch {
        FarthestSearch::new(reference, self.search_budget)
            .with_metric(self.metric)
            .with_min_distance(self.min_distance)
            .with_best_effort(self.best_effort)
    }

    pub fn validate(&self) -> Result<()> {
        self.request.validate()?;
        self.search(Vec3::ZERO).validate()
    }
}

/// Spawns the objective and moves it whenever it is grabbed.
#[derive(Debug)]
pub struct ObjectiveSpawner {
    template: ObjectTemplate,
    settings: ObjectiveSettings,
    objective: Option<SpawnId>,
}

impl ObjectiveSpawner {
    pub fn new(template: ObjectTemplate, settings: ObjectiveSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            template,
            settings,
            objective: None,
        })
    }

    pub fn settings(&self) -> &ObjectiveSettings {
        &self.settings
    }

    /// Engine id of the live objective.
    pub fn objective(&self) -> Option<SpawnId> {
        self.objective
    }

    /// Places the objective far from `player`. A live objective is moved instead of
    /// spawning a second one.
    pub fn spawn(
        &mut self,
        engine: &mut PlacementEngine,
        scene: PlacementScene<'_>,
        player: Vec3,
        rng: &mut dyn RngCore,
    ) -> Result<Placement> {
        let target = match self.objective.filter(|id| engine.get(*id).is_some()) {
            Some(id) => PlacementTarget::Live(id),
            None => PlacementTarget::Template(&self.template),
        };
        let search = self.settings.search(player);
        match engine.try_place_farthest(target, &self.settings.request, &search, scene, rng) {
            Ok(placed) => {
                self.objective = Some(placed.id);
                debug!(
                    "Objective {:?} placed at {:?}.",
                    placed.id, placed.pose.position
                );
                Ok(placed)
            }
            Err(err) => {
                error!("Could not spawn objective in room: {}", err);
                Err(err)
            }
        }
    }

    /// Moves the live objective away from `player`.
    ///
    /// Returns `Ok(None)` when no objective has been spawned yet.
    pub fn relocate(
        &mut self,
        engine: &mut PlacementEngine,
        scene: PlacementScene<'_>,
        player: Vec3,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Placement>> {
        let Some(id) = self.objective else {
            return Ok(None);
        };
        let search = self.settings.search(player);
        match engine.try_place_farthest(
            PlacementTarget::Live(id),
            &self.settings.request,
            &search,
            scene,
            rng,
        ) {
            Ok(placed) => Ok(Some(placed)),
            Err(err @ Error::UnknownEntity(_)) => {
                self.objective = None;
                Err(err)
            }
            Err(err) => {
                error!("Could not move objective to a new position: {}", err);
                Err(err)
            }
        }
    }

    /// Despawns the objective if it is live.
    pub fn clear(&mut self, engine: &mut PlacementEngine) -> bool {
        self.objective
            .take()
            .and_then(|id| engine.despawn(id))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::room::scanned::ScannedRoom;

    fn diamond() -> ObjectTemplate {
        ObjectTemplate::new("diamond").with_bounds(Vec3::splat(-0.1), Vec3::splat(0.1))
    }

    #[test]
    fn spawn_then_relocate_keeps_one_objective() {
        let room = ScannedRoom::rectangular(6.0, 4.0, 2.5).expect("room");
        let mut engine = PlacementEngine::new();
        let mut spawner =
            ObjectiveSpawner::new(diamond(), ObjectiveSettings::default()).expect("settings");
        let mut rng = StdRng::seed_from_u64(1);
        let scene = PlacementScene::new(&room);

        assert!(spawner
            .relocate(&mut engine, scene, Vec3::ZERO, &mut rng)
            .expect("nothing to move")
            .is_none());

        let player = Vec3::new(-2.5, 1.6, 0.0);
        let placed = spawner
            .spawn(&mut engine, scene, player, &mut rng)
            .expect("spawn");
        // Twenty ranked floor samples in a 6 m room land well away from the player.
        assert!(placed.pose.position.x > 0.0);
        assert_eq!(spawner.objective(), Some(placed.id));

        let moved = spawner
            .relocate(&mut engine, scene, placed.pose.position, &mut rng)
            .expect("relocate")
            .expect("live objective");
        assert!(moved.relocated);
        assert_eq!(moved.id, placed.id);
        assert_eq!(engine.spawned().len(), 1);

        let again = spawner
            .spawn(&mut engine, scene, player, &mut rng)
            .expect("respawn moves");
        assert!(again.relocated);
        assert_eq!(engine.spawned().len(), 1);

        assert!(spawner.clear(&mut engine));
        assert!(engine.spawned().is_empty());
        assert!(!spawner.clear(&mut engine));
    }

    #[test]
    fn lost_objective_is_forgotten() {
        let room = ScannedRoom::rectangular(4.0, 4.0, 2.5).expect("room");
        let mut engine = PlacementEngine::new();
        let mut spawner =
            ObjectiveSpawner::new(diamond(), ObjectiveSettings::default()).expect("settings");
        let mut rng = StdRng::seed_from_u64(2);
        let scene = PlacementScene::new(&room);

        spawner
            .spawn(&mut engine, scene, Vec3::ZERO, &mut rng)
            .expect("spawn");
        engine.clear_spawned();
        let err = spawner
            .relocate(&mut engine, scene, Vec3::ZERO, &mut rng)
            .expect_err("despawned behind the spawner's back");
        assert!(matches!(err, Error::UnknownEntity(_)));
        assert_eq!(spawner.objective(), None);
    }

    #[test]
    fn settings_build_search() {
        let s = ObjectiveSettings::default()
            .with_search_budget(5)
            .with_metric(DistanceMetric::Horizontal)
            .with_best_effort(true);
        let search = s.search(Vec3::ONE);
        assert_eq!(search.search_budget, 5);
        assert_eq!(search.metric, DistanceMetric::Horizontal);
        assert!(search.best_effort);
        assert_eq!(search.reference, Vec3::ONE);
        assert!(ObjectiveSettings::default()
            .with_search_budget(0)
            .validate()
            .is_err());
    }
}
