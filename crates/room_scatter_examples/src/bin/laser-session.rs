use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use room_scatter::prelude::*;
use room_scatter_examples::{diamond_template, furnished_l_room, init_tracing, laser_template};
use tracing::info;

const FRAME: f32 = 1.0 / 72.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let room = furnished_l_room()?;
    let config = SessionConfig::default();
    let mut session = GameSession::new(config, laser_template(), diamond_template())?;
    let hits = session.subscribe(GameEvent::HitLaser);
    let mut rng = StdRng::seed_from_u64(42);
    let scene = PlacementScene::new(&room);

    session.on_room_loaded(&mut rng);

    let mut head = Vec3::new(-2.0, 1.6, -1.0);
    for frame in 0..360u32 {
        // Every second the player reaches the objective and grabs it.
        if frame > 0 && frame % 72 == 0 {
            if let Some(obj) = session
                .objective()
                .objective()
                .and_then(|id| session.engine().get(id))
            {
                head = Vec3::new(obj.pose.position.x, 1.6, obj.pose.position.z);
            }
            session.publish(GameEvent::DiamondGrab);
        }

        let report = session.tick(FRAME, scene, head, &mut rng);
        let quiet = TickReport {
            near_wall: report.near_wall,
            ..TickReport::default()
        };
        if report != quiet {
            info!("frame {frame}: {report:?}");
        }
    }

    for laser in session.lasers().active() {
        info!(
            "{:?} laser {:?} at {:?}, beam {:?}",
            laser.kind, laser.id, laser.pose.position, laser.beam
        );
    }
    info!(
        "Final score {} after {} laser hits; {} objects in the room; near wall: {}.",
        session.score().current(),
        hits.drain().len(),
        session.engine().spawned().len(),
        session.is_player_near_wall()
    );

    let removed = session.teardown();
    info!("Teardown removed {removed} objects.");
    Ok(())
}
