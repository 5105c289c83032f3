use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::{Vec2, Vec3};
use room_scatter::prelude::{Aabb, SceneAnchor, SceneLabels, ScannedRoom};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// L-shaped living room with `furniture` tables spread along the long side.
pub fn furnished_room(furniture: usize) -> ScannedRoom {
    let floor = vec![
        Vec2::new(-3.0, -2.0),
        Vec2::new(3.0, -2.0),
        Vec2::new(3.0, 0.5),
        Vec2::new(0.5, 0.5),
        Vec2::new(0.5, 2.0),
        Vec2::new(-3.0, 2.0),
    ];
    let mut room = ScannedRoom::try_new(floor, 0.0, 2.6).expect("room");
    for i in 0..furniture {
        let x = -2.5 + (i as f32 % 10.0) * 0.5;
        let z = -1.6 + (i / 10) as f32 * 0.6;
        room.add_anchor(SceneAnchor::volume(
            SceneLabels::TABLE,
            Aabb::new(Vec3::new(x, 0.0, z), Vec3::new(x + 0.3, 0.7, z + 0.3)),
        ));
    }
    room
}
