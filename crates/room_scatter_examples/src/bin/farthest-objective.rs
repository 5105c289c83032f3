use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use room_scatter::prelude::*;
use room_scatter_examples::{diamond_template, furnished_l_room, init_tracing};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let room = furnished_l_room()?;
    let template = diamond_template();
    let request = PlacementRequest::default();
    let mut engine = PlacementEngine::new();
    let mut rng = StdRng::seed_from_u64(7);

    let mut player = Vec3::new(-2.5, 1.6, -1.5);
    let mut objective = None;

    // Grab the objective a few times, walking to it each time.
    for round in 0..5 {
        for metric in [DistanceMetric::Full3d, DistanceMetric::Horizontal] {
            let search = FarthestSearch::new(player, 20).with_metric(metric);
            let target = match objective {
                Some(id) => PlacementTarget::Live(id),
                None => PlacementTarget::Template(&template),
            };
            let mut accepted = VecSink::new();
            let placed = engine.try_place_farthest_with_events(
                target,
                &request,
                &search,
                PlacementScene::new(&room),
                &mut rng,
                &mut accepted,
            )?;
            objective = Some(placed.id);
            let resting_on = room
                .nearest_anchor(placed.pose.position, LabelFilter::default())
                .map(SceneAnchor::label);
            info!(
                "round {} {:?}: objective at {:?}, {:.2} m from the player ({} candidates ranked, relocated: {}, nearest anchor: {:?})",
                round,
                metric,
                placed.pose.position,
                metric.distance(player, placed.pose.position),
                accepted.count(PlacementEventKind::CandidateAccepted),
                placed.relocated,
                resting_on
            );
        }
        if let Some(obj) = objective.and_then(|id| engine.get(id)) {
            player = room.floor_position(obj.pose.position) + Vec3::Y * 1.6;
        }
    }

    info!("Spawned set holds {} object(s).", engine.spawned().len());
    Ok(())
}
