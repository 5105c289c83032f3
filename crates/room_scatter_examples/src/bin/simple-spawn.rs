use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use room_scatter::prelude::*;
use room_scatter_examples::{box_room, init_tracing};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Unit box room with the ceiling at 2.5 m.
    let room = box_room(1.0, 1.0, 2.5)?;
    let template =
        ObjectTemplate::new("ceiling_cube").with_bounds(Vec3::splat(-0.1), Vec3::splat(0.1));
    let request = PlacementRequest::new(SpawnLocation::HangingDown).with_max_iterations(1000);

    let mut engine = PlacementEngine::new();
    let mut rng = StdRng::seed_from_u64(2025);
    let mut events = VecSink::new();

    let placed = engine.try_place_with_events(
        PlacementTarget::Template(&template),
        &request,
        PlacementScene::new(&room),
        &mut rng,
        &mut events,
    )?;

    info!(
        "Placed {:?} at {:?} facing {:?} after {} iterations ({} rejected).",
        placed.id,
        placed.pose.position,
        placed.normal,
        placed.iterations,
        events.count(PlacementEventKind::CandidateRejected)
    );

    // An obstruction right under the ceiling leaves no valid sample.
    let blocked = box_room(1.0, 1.0, 2.5)?.with_anchor(SceneAnchor::volume(
        SceneLabels::OTHER,
        Aabb::new(Vec3::new(-0.5, 2.0, -0.5), Vec3::new(0.5, 2.5, 0.5)),
    ));
    match engine.try_place(
        PlacementTarget::Template(&template),
        &request,
        PlacementScene::new(&blocked),
        &mut rng,
    ) {
        Ok(p) => info!("Unexpected placement at {:?}", p.pose.position),
        Err(err) => info!("Blocked ceiling: {err}"),
    }

    let removed = engine.clear_spawned();
    info!("Cleared {} spawned objects.", removed.len());
    Ok(())
}
