#![forbid(unsafe_code)]
//! Shared helpers for the room_scatter example binaries.
use glam::{Vec2, Vec3};
use room_scatter::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Box room with the floor at y = 0 and no furniture.
pub fn box_room(width: f32, depth: f32, height: f32) -> Result<ScannedRoom> {
    ScannedRoom::rectangular(width, depth, height)
}

/// L-shaped living room with a couch, a table, a bed, a window and a painting.
pub fn furnished_l_room() -> Result<ScannedRoom> {
    let floor = vec![
        Vec2::new(-3.0, -2.0),
        Vec2::new(3.0, -2.0),
        Vec2::new(3.0, 0.5),
        Vec2::new(0.5, 0.5),
        Vec2::new(0.5, 2.5),
        Vec2::new(-3.0, 2.5),
    ];
    let room = ScannedRoom::try_new(floor, 0.0, 2.6)?
        .with_anchor(SceneAnchor::volume(
            SceneLabels::COUCH,
            Aabb::new(Vec3::new(-2.9, 0.0, 1.5), Vec3::new(-0.9, 0.8, 2.4)),
        ))
        .with_anchor(SceneAnchor::volume(
            SceneLabels::TABLE,
            Aabb::new(Vec3::new(-1.2, 0.0, -0.4), Vec3::new(-0.2, 0.75, 0.4)),
        ))
        .with_anchor(SceneAnchor::volume(
            SceneLabels::BED,
            Aabb::new(Vec3::new(1.0, 0.0, -1.9), Vec3::new(2.9, 0.5, -0.3)),
        ))
        .with_anchor(SceneAnchor::plane(
            SceneLabels::WINDOW_FRAME,
            Vec3::new(0.0, 1.4, -1.99),
            Vec3::Z,
            Vec2::new(1.2, 1.0),
        ))
        .with_anchor(SceneAnchor::plane(
            SceneLabels::WALL_ART,
            Vec3::new(-2.99, 1.6, 0.0),
            Vec3::X,
            Vec2::new(0.8, 0.6),
        ));
    Ok(room)
}

/// Laser emitter template used across examples.
pub fn laser_template() -> ObjectTemplate {
    ObjectTemplate::new("laser").with_bounds(Vec3::splat(-0.05), Vec3::splat(0.05))
}

/// Diamond objective template used across examples.
pub fn diamond_template() -> ObjectTemplate {
    ObjectTemplate::new("diamond").with_bounds(
        Vec3::new(-0.1, -0.1, -0.1),
        Vec3::new(0.1, 0.15, 0.1),
    )
}
