//! Laser obstacles.
//!
//! A laser is a small emitter placed by the engine plus a beam traced through the room.
//! Ceiling lasers hang from downward-facing surfaces and shoot to the floor. Horizontal
//! lasers sit on a wall, are moved to the player's head height, and shoot across the
//! room along the wall normal.
use glam::Vec3;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::ray::Ray;
use crate::placement::engine::{PlacementEngine, PlacementScene, PlacementTarget};
use crate::placement::request::{ObjectTemplate, PlacementRequest, SpawnLocation};
use crate::placement::{Pose, SpawnId};
use crate::room::{rand01, rand_range, RoomGeometry};

pub const DEFAULT_LASER_COUNT: u32 = 2;
pub const DEFAULT_LASER_WIDTH: f32 = 0.02;
pub const DEFAULT_HORIZONTAL_CHANCE: f32 = 0.3;
pub const DEFAULT_HEAD_HEIGHT_JITTER: f32 = 0.2;
pub const DEFAULT_HORIZONTAL_DELAY: f32 = 0.5;
pub const DEFAULT_MAX_BEAM_LENGTH: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaserKind {
    /// Hangs from the ceiling, beam pointing down.
    Ceiling,
    /// Mounted on a wall at head height, beam across the room.
    Horizontal,
}

impl LaserKind {
    pub fn location(self) -> SpawnLocation {
        match self {
            Self::Ceiling => SpawnLocation::HangingDown,
            Self::Horizontal => SpawnLocation::VerticalSurfaces,
        }
    }
}

/// Straight beam segment between two room hits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub start: Vec3,
    pub end: Vec3,
}

impl Beam {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Shortest distance from `point` to the segment.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        let ab = self.end - self.start;
        let len2 = ab.length_squared();
        if len2 <= f32::EPSILON {
            return point.distance(self.start);
        }
        let t = ((point - self.start).dot(ab) / len2).clamp(0.0, 1.0);
        point.distance(self.start + ab * t)
    }
}

/// A spawned laser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Laser {
    pub id: SpawnId,
    pub kind: LaserKind,
    pub pose: Pose,
    /// Direction the beam travels from the emitter.
    pub normal: Vec3,
    /// `None` when the beam raycast missed the room.
    pub beam: Option<Beam>,
    pub width: f32,
}

impl Laser {
    /// Whether a sphere at `point` with `radius` touches the beam.
    pub fn touches(&self, point: Vec3, radius: f32) -> bool {
        self.beam
            .is_some_and(|beam| beam.distance_to(point) <= self.width + radius)
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LaserSettings {
    /// Lasers spawned when a room is loaded or lasers are respawned.
    pub count: u32,
    /// Beam radius used for hit tests.
    pub width: f32,
    /// Probability in `[0, 1]` that a new laser is horizontal.
    pub horizontal_chance: f32,
    /// Horizontal lasers are moved to head height plus a uniform offset in
    /// `[-jitter, jitter]`.
    pub head_height_jitter: f32,
    /// Seconds to wait before a horizontal laser is placed.
    pub horizontal_delay: f32,
    pub max_beam_length: f32,
    /// Base constraints. The surface class is replaced per laser kind.
    pub request: PlacementRequest,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_LASER_COUNT,
            width: DEFAULT_LASER_WIDTH,
            horizontal_chance: DEFAULT_HORIZONTAL_CHANCE,
            head_height_jitter: DEFAULT_HEAD_HEIGHT_JITTER,
            horizontal_delay: DEFAULT_HORIZONTAL_DELAY,
            max_beam_length: DEFAULT_MAX_BEAM_LENGTH,
            request: PlacementRequest::default(),
        }
    }
}

impl LaserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_horizontal_chance(mut self, chance: f32) -> Self {
        self.horizontal_chance = chance;
        self
    }

    pub fn with_head_height_jitter(mut self, jitter: f32) -> Self {
        self.head_height_jitter = jitter;
        self
    }

    pub fn with_horizontal_delay(mut self, seconds: f32) -> Self {
        self.horizontal_delay = seconds;
        self
    }

    pub fn with_request(mut self, request: PlacementRequest) -> Self {
        self.request = request;
        self
    }

    /// Seconds a new laser of `kind` waits before it is placed.
    pub fn delay_for(&self, kind: LaserKind) -> f32 {
        match kind {
            LaserKind::Ceiling => 0.0,
            LaserKind::Horizontal => self.horizontal_delay,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0) || !self.width.is_finite() {
            return Err(Error::InvalidConfig("laser width must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.horizontal_chance) {
            return Err(Error::InvalidConfig(
                "horizontal_chance must be within [0, 1]".into(),
            ));
        }
        if !(self.head_height_jitter >= 0.0) || !self.head_height_jitter.is_finite() {
            return Err(Error::InvalidConfig(
                "head_height_jitter must be finite and >= 0".into(),
            ));
        }
        if !(self.horizontal_delay >= 0.0) || !self.horizontal_delay.is_finite() {
            return Err(Error::InvalidConfig(
                "horizontal_delay must be finite and >= 0".into(),
            ));
        }
        if !(self.max_beam_length > 0.0) {
            return Err(Error::InvalidConfig("max_beam_length must be > 0".into()));
        }
        self.request.validate()
    }
}

/// Places lasers through a [`PlacementEngine`] and tracks the active ones.
#[derive(Debug)]
pub struct LaserSpawner {
    template: ObjectTemplate,
    settings: LaserSettings,
    active: Vec<Laser>,
}

impl LaserSpawner {
    pub fn new(template: ObjectTemplate, settings: LaserSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            template,
            settings,
            active: Vec::new(),
        })
    }

    pub fn settings(&self) -> &LaserSettings {
        &self.settings
    }

    pub fn active(&self) -> &[Laser] {
        &self.active
    }

    /// Draws the kind of the next laser.
    pub fn choose_kind(&self, rng: &mut dyn RngCore) -> LaserKind {
        if rand01(rng) < self.settings.horizontal_chance {
            LaserKind::Horizontal
        } else {
            LaserKind::Ceiling
        }
    }

    /// Places one laser of `kind` and traces its beam.
    ///
    /// `head` is the player's head position; horizontal lasers are moved to its height.
    pub fn spawn_laser(
        &mut self,
        kind: LaserKind,
        engine: &mut PlacementEngine,
        scene: PlacementScene<'_>,
        head: Vec3,
        rng: &mut dyn RngCore,
    ) -> Result<Laser> {
        debug!("Spawning {:?} laser.", kind);
        let request = self.settings.request.clone().with_location(kind.location());
        let placed = engine.try_place(
            PlacementTarget::Template(&self.template),
            &request,
            scene,
            rng,
        )?;

        let mut pose = placed.pose;
        if kind == LaserKind::Horizontal {
            let jitter = self.settings.head_height_jitter;
            pose.position.y = head.y + rand_range(rng, -jitter, jitter);
            engine.set_pose(placed.id, pose)?;
        }

        let beam = self.trace_beam(scene.room, pose.position, placed.normal);
        if beam.is_none() {
            warn!(
                "Beam raycast from laser {:?} at {:?} did not hit the room.",
                placed.id, pose.position
            );
        }

        let laser = Laser {
            id: placed.id,
            kind,
            pose,
            normal: placed.normal,
            beam,
            width: self.settings.width,
        };
        self.active.push(laser);
        Ok(laser)
    }

    /// Spawns `settings.count` lasers right away and returns how many succeeded.
    pub fn spawn_initial(
        &mut self,
        engine: &mut PlacementEngine,
        scene: PlacementScene<'_>,
        head: Vec3,
        rng: &mut dyn RngCore,
    ) -> usize {
        let mut spawned = 0;
        for _ in 0..self.settings.count {
            let kind = self.choose_kind(rng);
            match self.spawn_laser(kind, engine, scene, head, rng) {
                Ok(_) => spawned += 1,
                Err(err) => warn!("Failed to spawn {:?} laser: {}", kind, err),
            }
        }
        spawned
    }

    /// Despawns every active laser and returns how many were removed.
    pub fn clear_lasers(&mut self, engine: &mut PlacementEngine) -> usize {
        let count = self.active.len();
        for laser in self.active.drain(..) {
            engine.despawn(laser.id);
        }
        debug!("Cleared {} lasers.", count);
        count
    }

    /// Clears all lasers and spawns a fresh initial set.
    pub fn respawn_lasers(
        &mut self,
        engine: &mut PlacementEngine,
        scene: PlacementScene<'_>,
        head: Vec3,
        rng: &mut dyn RngCore,
    ) -> usize {
        self.clear_lasers(engine);
        self.spawn_initial(engine, scene, head, rng)
    }

    /// Lasers whose beam touches a sphere at `point`.
    pub fn touching(&self, point: Vec3, radius: f32) -> impl Iterator<Item = &Laser> + '_ {
        self.active.iter().filter(move |l| l.touches(point, radius))
    }

    /// Forgets lasers that are no longer in the engine's spawned set.
    pub fn retain_tracked(&mut self, engine: &PlacementEngine) {
        self.active.retain(|l| engine.get(l.id).is_some());
    }

    fn trace_beam(&self, room: &dyn RoomGeometry, origin: Vec3, normal: Vec3) -> Option<Beam> {
        let max = self.settings.max_beam_length;
        let end = room.raycast(&Ray::new(origin, normal), max)?;
        // Zero-size emitters sit on their surface and cannot hit it going backwards.
        let start = room
            .raycast(&Ray::new(origin, -normal), max)
            .map_or(origin, |hit| hit.point);
        Some(Beam {
            start,
            end: end.point,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::room::scanned::ScannedRoom;

    fn emitter() -> ObjectTemplate {
        ObjectTemplate::new("laser").with_bounds(Vec3::splat(-0.05), Vec3::splat(0.05))
    }

    fn room() -> ScannedRoom {
        ScannedRoom::rectangular(4.0, 3.0, 2.5).expect("room")
    }

    #[test]
    fn ceiling_laser_spans_floor_to_ceiling() {
        let room = room();
        let mut engine = PlacementEngine::new();
        let mut lasers = LaserSpawner::new(emitter(), LaserSettings::default()).expect("settings");
        let mut rng = StdRng::seed_from_u64(1);

        let laser = lasers
            .spawn_laser(
                LaserKind::Ceiling,
                &mut engine,
                PlacementScene::new(&room),
                Vec3::new(0.0, 1.6, 0.0),
                &mut rng,
            )
            .expect("ceiling laser");

        assert_eq!(laser.normal, Vec3::NEG_Y);
        assert!((laser.pose.position.y - 2.45).abs() < 1e-4);
        let beam = laser.beam.expect("beam");
        assert!((beam.start.y - 2.5).abs() < 1e-4);
        assert!(beam.end.y.abs() < 1e-4);
        assert!((beam.length() - 2.5).abs() < 1e-3);
        assert_eq!(lasers.active().len(), 1);
        assert_eq!(engine.spawned().len(), 1);
    }

    #[test]
    fn horizontal_laser_moves_to_head_height() {
        let room = room();
        let mut engine = PlacementEngine::new();
        let mut lasers = LaserSpawner::new(emitter(), LaserSettings::default()).expect("settings");
        let mut rng = StdRng::seed_from_u64(2);
        let head = Vec3::new(0.0, 1.6, 0.0);

        for _ in 0..10 {
            let laser = lasers
                .spawn_laser(
                    LaserKind::Horizontal,
                    &mut engine,
                    PlacementScene::new(&room),
                    head,
                    &mut rng,
                )
                .expect("horizontal laser");
            assert!((laser.pose.position.y - head.y).abs() <= 0.2 + 1e-5);
            assert!(laser.normal.y.abs() < 1e-5);
            assert_eq!(engine.get(laser.id).map(|o| o.pose), Some(laser.pose));
            let beam = laser.beam.expect("beam");
            // Beam is horizontal and crosses the room.
            assert!((beam.start.y - beam.end.y).abs() < 1e-4);
            assert!(beam.length() >= 3.0 - 1e-3);
        }
    }

    #[test]
    fn touches_uses_width_and_radius() {
        let laser = Laser {
            id: SpawnId(0),
            kind: LaserKind::Ceiling,
            pose: Pose::default(),
            normal: Vec3::NEG_Y,
            beam: Some(Beam {
                start: Vec3::new(0.0, 2.5, 0.0),
                end: Vec3::ZERO,
            }),
            width: 0.02,
        };
        assert!(laser.touches(Vec3::new(0.1, 1.6, 0.0), 0.1));
        assert!(!laser.touches(Vec3::new(0.2, 1.6, 0.0), 0.1));
        assert!(!laser.touches(Vec3::new(0.0, 3.0, 0.0), 0.1));

        let no_beam = Laser { beam: None, ..laser };
        assert!(!no_beam.touches(Vec3::new(0.0, 1.0, 0.0), 1.0));
    }

    #[test]
    fn kind_choice_follows_chance() {
        let mut rng = StdRng::seed_from_u64(3);
        let never = LaserSpawner::new(
            emitter(),
            LaserSettings::default().with_horizontal_chance(0.0),
        )
        .expect("settings");
        let always = LaserSpawner::new(
            emitter(),
            LaserSettings::default().with_horizontal_chance(1.0),
        )
        .expect("settings");
        for _ in 0..50 {
            assert_eq!(never.choose_kind(&mut rng), LaserKind::Ceiling);
            assert_eq!(always.choose_kind(&mut rng), LaserKind::Horizontal);
        }
    }

    #[test]
    fn clear_and_respawn() {
        let room = room();
        let mut engine = PlacementEngine::new();
        let settings = LaserSettings::default().with_count(3);
        let mut lasers = LaserSpawner::new(emitter(), settings).expect("settings");
        let mut rng = StdRng::seed_from_u64(4);
        let head = Vec3::new(0.0, 1.6, 0.0);
        let scene = PlacementScene::new(&room);

        assert_eq!(lasers.spawn_initial(&mut engine, scene, head, &mut rng), 3);
        let first: Vec<SpawnId> = lasers.active().iter().map(|l| l.id).collect();

        assert_eq!(lasers.respawn_lasers(&mut engine, scene, head, &mut rng), 3);
        assert_eq!(engine.spawned().len(), 3);
        assert!(lasers.active().iter().all(|l| !first.contains(&l.id)));

        assert_eq!(lasers.clear_lasers(&mut engine), 3);
        assert!(engine.spawned().is_empty());
    }

    #[test]
    fn settings_validation() {
        assert!(LaserSettings::default().validate().is_ok());
        assert_eq!(LaserSettings::default().delay_for(LaserKind::Horizontal), 0.5);
        assert_eq!(LaserSettings::default().delay_for(LaserKind::Ceiling), 0.0);
        assert!(LaserSettings::default().with_width(0.0).validate().is_err());
        assert!(LaserSettings::default()
            .with_horizontal_chance(1.5)
            .validate()
            .is_err());
        assert!(LaserSettings::default()
            .with_horizontal_delay(-1.0)
            .validate()
            .is_err());
        assert!(LaserSettings::default()
            .with_request(PlacementRequest::default().with_max_iterations(0))
            .validate()
            .is_err());
    }
}
