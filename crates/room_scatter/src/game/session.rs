//! Session coordinator.
//!
//! [`GameSession`] owns the placement engine and every game collaborator. The host
//! application calls [`GameSession::on_room_loaded`] once the room scan is available and
//! [`GameSession::tick`] every frame with the elapsed time, the room and the player's
//! head position. Spawns requested by the room load or by game events are deferred to
//! later ticks through a [`FrameScheduler`].
use std::collections::HashSet;

use glam::Vec3;
use rand::RngCore;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::game::bus::{GameEvent, GameEventBus, GameEventFilter, Subscription};
use crate::game::laser::{LaserKind, LaserSettings, LaserSpawner};
use crate::game::objective::{ObjectiveSettings, ObjectiveSpawner};
use crate::game::schedule::FrameScheduler;
use crate::game::score::{ScoreBoard, DEFAULT_LASER_HIT_PENALTY, DEFAULT_STARTING_SCORE};
use crate::placement::engine::{PlacementEngine, PlacementScene};
use crate::placement::request::ObjectTemplate;
use crate::placement::SpawnId;
use crate::room::DEFAULT_WALL_WARNING_DISTANCE;

/// Radius of the sphere around the player's head used for laser hits.
pub const DEFAULT_PLAYER_RADIUS: f32 = 0.1;

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub lasers: LaserSettings,
    pub objective: ObjectiveSettings,
    pub starting_score: i32,
    pub laser_hit_penalty: u32,
    pub player_radius: f32,
    /// New lasers queued each time the objective is grabbed.
    pub lasers_per_grab: u32,
    /// Head distance from a wall below which the player counts as near it.
    pub wall_warning_distance: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lasers: LaserSettings::default(),
            objective: ObjectiveSettings::default(),
            starting_score: DEFAULT_STARTING_SCORE,
            laser_hit_penalty: DEFAULT_LASER_HIT_PENALTY,
            player_radius: DEFAULT_PLAYER_RADIUS,
            lasers_per_grab: 1,
            wall_warning_distance: DEFAULT_WALL_WARNING_DISTANCE,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lasers(mut self, lasers: LaserSettings) -> Self {
        self.lasers = lasers;
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveSettings) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_starting_score(mut self, score: i32) -> Self {
        self.starting_score = score;
        self
    }

    pub fn with_laser_hit_penalty(mut self, penalty: u32) -> Self {
        self.laser_hit_penalty = penalty;
        self
    }

    pub fn with_player_radius(mut self, radius: f32) -> Self {
        self.player_radius = radius;
        self
    }

    pub fn with_lasers_per_grab(mut self, count: u32) -> Self {
        self.lasers_per_grab = count;
        self
    }

    pub fn with_wall_warning_distance(mut self, distance: f32) -> Self {
        self.wall_warning_distance = distance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.lasers.validate()?;
        self.objective.validate()?;
        if self.starting_score < 0 {
            return Err(Error::InvalidConfig("starting_score must be >= 0".into()));
        }
        if !(self.player_radius >= 0.0) || !self.player_radius.is_finite() {
            return Err(Error::InvalidConfig(
                "player_radius must be finite and >= 0".into(),
            ));
        }
        if !(self.wall_warning_distance >= 0.0) || !self.wall_warning_distance.is_finite() {
            return Err(Error::InvalidConfig(
                "wall_warning_distance must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a RON document. Missing fields keep their defaults.
    #[cfg(feature = "ron")]
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::de::from_str(source).map_err(|e| Error::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Deferred session work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionTask {
    SpawnLaser(LaserKind),
    SpawnObjective,
}

/// What happened during one [`GameSession::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tasks_run: usize,
    pub lasers_spawned: usize,
    pub objective_placed: bool,
    pub objective_moves: usize,
    pub laser_hits: usize,
    /// Placements that failed. Failures are logged and never abort the tick.
    pub failures: usize,
    /// The player's head is within the wall warning distance.
    pub near_wall: bool,
}

pub struct GameSession {
    config: SessionConfig,
    engine: PlacementEngine,
    lasers: LaserSpawner,
    objective: ObjectiveSpawner,
    score: ScoreBoard,
    bus: GameEventBus,
    inbox: Subscription,
    scheduler: FrameScheduler<SessionTask>,
    touching: HashSet<SpawnId>,
    near_wall: bool,
}

impl GameSession {
    pub fn new(
        config: SessionConfig,
        laser: ObjectTemplate,
        objective: ObjectTemplate,
    ) -> Result<Self> {
        config.validate()?;
        let mut bus = GameEventBus::new();
        let inbox = bus.subscribe(
            GameEventFilter::only(GameEvent::DiamondGrab).with(GameEvent::HitLaser),
        );
        Ok(Self {
            lasers: LaserSpawner::new(laser, config.lasers.clone())?,
            objective: ObjectiveSpawner::new(objective, config.objective.clone())?,
            score: ScoreBoard::new(config.starting_score),
            engine: PlacementEngine::new(),
            bus,
            inbox,
            scheduler: FrameScheduler::new(),
            touching: HashSet::new(),
            near_wall: false,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    pub fn lasers(&self) -> &LaserSpawner {
        &self.lasers
    }

    pub fn objective(&self) -> &ObjectiveSpawner {
        &self.objective
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    /// Wall proximity as of the last [`tick`](Self::tick).
    pub fn is_player_near_wall(&self) -> bool {
        self.near_wall
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Publishes a game event, e.g. a grab detected by the host's interaction system.
    pub fn publish(&mut self, event: GameEvent) -> usize {
        self.bus.publish(event)
    }

    /// Additional listener for session events such as laser hits.
    pub fn subscribe(&mut self, filter: impl Into<GameEventFilter>) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Tears down anything from a previous room and queues the initial lasers and the
    /// objective.
    pub fn on_room_loaded(&mut self, rng: &mut dyn RngCore) {
        let removed = self.teardown();
        if removed > 0 {
            debug!("Removed {} objects from the previous room.", removed);
        }
        self.score.reset();
        self.near_wall = false;
        for _ in 0..self.config.lasers.count {
            self.queue_laser(rng);
        }
        self.scheduler.next_tick(SessionTask::SpawnObjective);
        info!(
            "Room loaded; queued {} lasers and the objective.",
            self.config.lasers.count
        );
    }

    /// Advances the session by `dt` seconds.
    ///
    /// Runs due tasks first, then turns new laser contacts into [`GameEvent::HitLaser`]
    /// and updates wall proximity, then handles queued events. Work queued while handling events runs on a later tick.
    pub fn tick(
        &mut self,
        dt: f32,
        scene: PlacementScene<'_>,
        player: Vec3,
        rng: &mut dyn RngCore,
    ) -> TickReport {
        let mut report = TickReport::default();

        for task in self.scheduler.tick(dt) {
            report.tasks_run += 1;
            self.run_task(task, scene, player, rng, &mut report);
        }

        let now: HashSet<SpawnId> = self
            .lasers
            .touching(player, self.config.player_radius)
            .map(|l| l.id)
            .collect();
        let entered = now.difference(&self.touching).count();
        self.touching = now;
        for _ in 0..entered {
            self.bus.publish(GameEvent::HitLaser);
        }

        let near_wall = scene
            .room
            .is_near_wall(player, self.config.wall_warning_distance);
        if near_wall != self.near_wall {
            self.near_wall = near_wall;
            if near_wall {
                warn!("Player is within {} m of a wall.", self.config.wall_warning_distance);
            } else {
                debug!("Player is back in the safe area.");
            }
        }
        report.near_wall = near_wall;

        for event in self.inbox.drain() {
            match event {
                GameEvent::DiamondGrab => {
                    for _ in 0..self.config.lasers_per_grab {
                        self.queue_laser(rng);
                    }
                    match self.objective.relocate(&mut self.engine, scene, player, rng) {
                        Ok(Some(_)) => report.objective_moves += 1,
                        Ok(None) => debug!("Grab before the objective was spawned."),
                        Err(_) => report.failures += 1,
                    }
                }
                GameEvent::HitLaser => {
                    report.laser_hits += 1;
                    self.score.decrease(self.config.laser_hit_penalty);
                }
                other => trace!("Session ignores {:?}.", other),
            }
        }

        report
    }

    /// Clears the current lasers and queues a fresh set.
    pub fn respawn_lasers(&mut self, rng: &mut dyn RngCore) {
        self.lasers.clear_lasers(&mut self.engine);
        self.touching.clear();
        for _ in 0..self.config.lasers.count {
            self.queue_laser(rng);
        }
    }

    /// Drops pending work and despawns every object. Returns how many were removed.
    pub fn teardown(&mut self) -> usize {
        self.scheduler.clear();
        self.touching.clear();
        let objective = usize::from(self.objective.clear(&mut self.engine));
        let lasers = self.lasers.clear_lasers(&mut self.engine);
        objective + lasers + self.engine.clear_spawned().len()
    }

    fn queue_laser(&mut self, rng: &mut dyn RngCore) {
        let kind = self.lasers.choose_kind(rng);
        let delay = self.config.lasers.delay_for(kind);
        self.scheduler.after(delay, SessionTask::SpawnLaser(kind));
    }

    fn run_task(
        &mut self,
        task: SessionTask,
        scene: PlacementScene<'_>,
        player: Vec3,
        rng: &mut dyn RngCore,
        report: &mut TickReport,
    ) {
        match task {
            SessionTask::SpawnLaser(kind) => {
                match self.lasers.spawn_laser(kind, &mut self.engine, scene, player, rng) {
                    Ok(_) => report.lasers_spawned += 1,
                    Err(err) => {
                        warn!("Failed to spawn {:?} laser: {}", kind, err);
                        report.failures += 1;
                    }
                }
            }
            SessionTask::SpawnObjective => {
                match self.objective.spawn(&mut self.engine, scene, player, rng) {
                    Ok(_) => report.objective_placed = true,
                    Err(_) => report.failures += 1,
                }
            }
        }
    }
}
