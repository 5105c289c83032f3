//! Placement engine: bounded rejection sampling over room surfaces and the spawned set.
use glam::Vec3;
use rand::RngCore;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::placement::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::placement::footprint::{Footprint, FootprintOffsets};
use crate::placement::request::{FarthestSearch, ObjectTemplate, PlacementRequest};
use crate::placement::validity::{is_far_enough_from, validate_candidate, Candidate, Rejection};
use crate::placement::{Pose, SpawnId};
use crate::room::collider::OverlapQuery;
use crate::room::labels::SurfaceType;
use crate::room::RoomGeometry;

/// Room queries available to a placement call.
#[derive(Clone, Copy)]
pub struct PlacementScene<'a> {
    pub room: &'a dyn RoomGeometry,
    /// Physics overlap query; required when a request enables overlap checks.
    pub overlaps: Option<&'a dyn OverlapQuery>,
}

impl<'a> PlacementScene<'a> {
    pub fn new(room: &'a dyn RoomGeometry) -> Self {
        Self {
            room,
            overlaps: None,
        }
    }

    pub fn with_overlaps(mut self, overlaps: &'a dyn OverlapQuery) -> Self {
        self.overlaps = Some(overlaps);
        self
    }
}

/// What a placement call positions.
#[derive(Clone, Copy, Debug)]
pub enum PlacementTarget<'a> {
    /// Instantiate a new entity from a template.
    Template(&'a ObjectTemplate),
    /// Move an entity already in the spawned set.
    Live(SpawnId),
}

/// Entity created by the engine and retained for teardown.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedObject {
    pub id: SpawnId,
    pub name: String,
    pub footprint: Option<Footprint>,
    pub pose: Pose,
}

/// Successful placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub id: SpawnId,
    pub pose: Pose,
    /// Normal the object's up axis was aligned to.
    pub normal: Vec3,
    /// Raw surface point the pose was derived from.
    pub surface_point: Vec3,
    /// Raw surface samples drawn by the call.
    pub iterations: u32,
    /// Whether an existing entity was moved instead of a new one created.
    pub relocated: bool,
}

/// Places objects on room surfaces and owns the set of entities it created.
///
/// The engine is an explicit value handed to spawners; it is not synchronized and must
/// be driven from a single thread of control.
#[derive(Debug, Default)]
pub struct PlacementEngine {
    spawned: Vec<SpawnedObject>,
    next_id: u64,
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities created by this engine, in creation order.
    pub fn spawned(&self) -> &[SpawnedObject] {
        &self.spawned
    }

    pub fn get(&self, id: SpawnId) -> Option<&SpawnedObject> {
        self.spawned.iter().find(|o| o.id == id)
    }

    /// Overwrites the pose of a tracked entity.
    pub fn set_pose(&mut self, id: SpawnId, pose: Pose) -> Result<()> {
        let object = self
            .spawned
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(Error::UnknownEntity(id))?;
        object.pose = pose;
        Ok(())
    }

    /// Removes one entity from the spawned set.
    pub fn despawn(&mut self, id: SpawnId) -> Option<SpawnedObject> {
        let idx = self.spawned.iter().position(|o| o.id == id)?;
        Some(self.spawned.remove(idx))
    }

    /// First-valid placement.
    pub fn try_place(
        &mut self,
        target: PlacementTarget<'_>,
        request: &PlacementRequest,
        scene: PlacementScene<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Placement> {
        self.try_place_with_events(target, request, scene, rng, &mut ())
    }

    /// First-valid placement, streaming candidate and outcome events to `sink`.
    ///
    /// Draws at most `request.max_iterations` surface samples. Every rejected candidate
    /// is discarded and a fresh sample drawn.
    pub fn try_place_with_events(
        &mut self,
        target: PlacementTarget<'_>,
        request: &PlacementRequest,
        scene: PlacementScene<'_>,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Placement> {
        let (name, footprint) = self.resolve(target)?;
        let offsets = self.prepare(&name, footprint.as_ref(), request, &scene, sink)?;

        for iteration in 1..=request.max_iterations {
            let candidate = self.draw(&name, request.surface, &offsets, request, &scene, rng, false, sink)?;

            if let Err(reason) =
                validate_candidate(scene.room, scene.overlaps, &candidate, request, &offsets)
            {
                reject(sink, iteration, &candidate, reason);
                continue;
            }

            return self.commit(target, name, footprint, &candidate, iteration, sink);
        }

        warn!(
            "Failed to find valid spawn position for '{}' after {} iterations.",
            name, request.max_iterations
        );
        let err = Error::IterationBudgetExhausted {
            max_iterations: request.max_iterations,
        };
        fail(sink, &name, &err);
        Err(err)
    }

    /// Farthest-point placement on upward-facing surfaces.
    pub fn try_place_farthest(
        &mut self,
        target: PlacementTarget<'_>,
        request: &PlacementRequest,
        search: &FarthestSearch,
        scene: PlacementScene<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Placement> {
        self.try_place_farthest_with_events(target, request, search, scene, rng, &mut ())
    }

    /// Farthest-point placement, streaming events to `sink`.
    ///
    /// Ranks `search.search_budget` valid candidates by distance from `search.reference`
    /// and commits the farthest. The object faces into the surface it was sampled from.
    /// Running out of raw iterations first is a failure even when valid candidates were
    /// seen, unless `search.best_effort` is set.
    pub fn try_place_farthest_with_events(
        &mut self,
        target: PlacementTarget<'_>,
        request: &PlacementRequest,
        search: &FarthestSearch,
        scene: PlacementScene<'_>,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Placement> {
        let (name, footprint) = self.resolve(target)?;
        search.validate()?;
        let offsets = self.prepare(&name, footprint.as_ref(), request, &scene, sink)?;

        let mut best: Option<(f32, Candidate, u32)> = None;
        let mut remaining = search.search_budget;

        for iteration in 1..=request.max_iterations {
            let candidate = self.draw(
                &name,
                SurfaceType::FACING_UP,
                &offsets,
                request,
                &scene,
                rng,
                true,
                sink,
            )?;

            if let Err(reason) =
                validate_candidate(scene.room, scene.overlaps, &candidate, request, &offsets)
            {
                reject(sink, iteration, &candidate, reason);
                continue;
            }
            if !is_far_enough_from(&candidate, search.reference, search.metric, search.min_distance)
            {
                reject(sink, iteration, &candidate, Rejection::TooCloseToPlayer);
                continue;
            }

            let distance = search.metric.distance(search.reference, candidate.position);
            if best.is_none_or(|(d, _, _)| distance > d) {
                best = Some((distance, candidate, iteration));
            }
            remaining -= 1;
            trace!(
                "Remaining candidates to find farthest point for '{}': {}.",
                name,
                remaining
            );
            if sink.wants(PlacementEventKind::CandidateAccepted) {
                sink.send(PlacementEvent::CandidateAccepted {
                    iteration,
                    position: candidate.position,
                    distance,
                    remaining,
                });
            }

            if remaining == 0 {
                if let Some((distance, winner, _)) = best {
                    debug!(
                        "Farthest point for '{}' is {:.2} from the reference after {} iterations.",
                        name, distance, iteration
                    );
                    return self.commit(target, name, footprint, &winner, iteration, sink);
                }
            }
        }

        let accepted = search.search_budget - remaining;
        if search.best_effort {
            if let Some((distance, winner, _)) = best {
                warn!(
                    "Farthest-point search for '{}' ranked {} of {} candidates; using best at {:.2}.",
                    name, accepted, search.search_budget, distance
                );
                return self.commit(target, name, footprint, &winner, request.max_iterations, sink);
            }
        }

        warn!(
            "Farthest-point search for '{}' ranked {} of {} candidates in {} iterations.",
            name, accepted, search.search_budget, request.max_iterations
        );
        let err = Error::SearchBudgetUnfilled {
            max_iterations: request.max_iterations,
            search_budget: search.search_budget,
            accepted,
        };
        fail(sink, &name, &err);
        Err(err)
    }

    /// Removes every spawned entity, newest first, and returns them in that order.
    pub fn clear_spawned(&mut self) -> Vec<SpawnedObject> {
        self.clear_spawned_with_events(&mut ())
    }

    pub fn clear_spawned_with_events(&mut self, sink: &mut dyn EventSink) -> Vec<SpawnedObject> {
        let mut removed: Vec<SpawnedObject> = self.spawned.drain(..).collect();
        removed.reverse();
        if sink.wants(PlacementEventKind::Despawned) {
            for object in &removed {
                sink.send(PlacementEvent::Despawned {
                    id: object.id,
                    name: object.name.clone(),
                });
            }
        }
        debug!("Cleared {} spawned objects.", removed.len());
        removed
    }

    fn resolve(&self, target: PlacementTarget<'_>) -> Result<(String, Option<Footprint>)> {
        match target {
            PlacementTarget::Template(template) => {
                Ok((template.name.clone(), template.footprint))
            }
            PlacementTarget::Live(id) => self
                .get(id)
                .map(|o| (o.name.clone(), o.footprint))
                .ok_or(Error::UnknownEntity(id)),
        }
    }

    fn prepare(
        &self,
        name: &str,
        footprint: Option<&Footprint>,
        request: &PlacementRequest,
        scene: &PlacementScene<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<FootprintOffsets> {
        let check = request.validate().and_then(|_| {
            if request.check_overlaps && footprint.is_some() && scene.overlaps.is_none() {
                Err(Error::InvalidConfig(
                    "overlap checks need an overlap query".into(),
                ))
            } else {
                Ok(())
            }
        });
        if let Err(err) = check {
            fail(sink, name, &err);
            return Err(err);
        }
        Ok(FootprintOffsets::compute(footprint, request.override_bounds))
    }

    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        name: &str,
        surface: SurfaceType,
        offsets: &FootprintOffsets,
        request: &PlacementRequest,
        scene: &PlacementScene<'_>,
        rng: &mut dyn RngCore,
        invert_facing: bool,
        sink: &mut dyn EventSink,
    ) -> Result<Candidate> {
        match scene
            .room
            .sample_surface(surface, offsets.min_radius, request.labels, rng)
        {
            Some(sample) => Ok(Candidate::from_sample(&sample, offsets, invert_facing)),
            None => {
                error!(
                    "Failed to generate random position on surface {:?} for '{}'.",
                    surface, name
                );
                let err = Error::NoSurfaceSamples { surface };
                fail(sink, name, &err);
                Err(err)
            }
        }
    }

    fn commit(
        &mut self,
        target: PlacementTarget<'_>,
        name: String,
        footprint: Option<Footprint>,
        candidate: &Candidate,
        iterations: u32,
        sink: &mut dyn EventSink,
    ) -> Result<Placement> {
        let pose = candidate.pose();
        let (id, relocated) = match target {
            PlacementTarget::Template(_) => {
                let id = SpawnId(self.next_id);
                self.next_id += 1;
                self.spawned.push(SpawnedObject {
                    id,
                    name: name.clone(),
                    footprint,
                    pose,
                });
                debug!(
                    "Spawned '{}' as {:?} at {:?} after {} iterations.",
                    name, id, pose.position, iterations
                );
                if sink.wants(PlacementEventKind::Spawned) {
                    sink.send(PlacementEvent::Spawned {
                        id,
                        name,
                        pose,
                        iterations,
                    });
                }
                (id, false)
            }
            PlacementTarget::Live(id) => {
                self.set_pose(id, pose)?;
                debug!(
                    "Moved '{}' ({:?}) to {:?} after {} iterations.",
                    name, id, pose.position, iterations
                );
                if sink.wants(PlacementEventKind::Relocated) {
                    sink.send(PlacementEvent::Relocated {
                        id,
                        pose,
                        iterations,
                    });
                }
                (id, true)
            }
        };

        Ok(Placement {
            id,
            pose,
            normal: candidate.facing,
            surface_point: candidate.surface_point,
            iterations,
            relocated,
        })
    }
}

fn reject(sink: &mut dyn EventSink, iteration: u32, candidate: &Candidate, reason: Rejection) {
    trace!(
        "Candidate {} at {:?} rejected: {}.",
        iteration,
        candidate.position,
        reason.as_str()
    );
    if sink.wants(PlacementEventKind::CandidateRejected) {
        sink.send(PlacementEvent::CandidateRejected {
            iteration,
            position: candidate.position,
            reason,
        });
    }
}

fn fail(sink: &mut dyn EventSink, name: &str, err: &Error) {
    if sink.wants(PlacementEventKind::Failed) {
        sink.send(PlacementEvent::Failed {
            name: name.to_owned(),
            message: err.to_string(),
        });
    }
}
