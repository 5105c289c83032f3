mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use room_scatter::prelude::*;

const FURNITURE_COUNTS: [usize; 4] = [0, 4, 16, 40];
const QUERIES: usize = 1024;

fn sampling_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("room/sample_surface");

    for &furniture in &FURNITURE_COUNTS {
        let room = common::furnished_room(furniture);
        group.throughput(common::elements_throughput(QUERIES));

        for (label, surface) in [
            ("all", SurfaceType::ALL),
            ("up", SurfaceType::FACING_UP),
            ("vertical", SurfaceType::VERTICAL),
        ] {
            group.bench_with_input(BenchmarkId::new(label, furniture), &furniture, |b, _| {
                let mut rng = StdRng::seed_from_u64(3);
                b.iter(|| {
                    for _ in 0..QUERIES {
                        black_box(room.sample_surface(
                            surface,
                            0.1,
                            LabelFilter::default(),
                            &mut rng,
                        ));
                    }
                });
            });
        }
    }

    group.finish();
}

fn query_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("room/queries");

    for &furniture in &FURNITURE_COUNTS {
        let room = common::furnished_room(furniture);
        let points: Vec<Vec3> = (0..QUERIES)
            .map(|i| {
                let t = i as f32 / QUERIES as f32;
                Vec3::new(-3.0 + 6.0 * t, 0.3 + 2.0 * t, -2.0 + 4.0 * (1.0 - t))
            })
            .collect();
        group.throughput(common::elements_throughput(points.len()));

        group.bench_with_input(BenchmarkId::new("in_room", furniture), &furniture, |b, _| {
            b.iter(|| {
                let inside = points
                    .iter()
                    .filter(|p| room.is_position_in_room(**p))
                    .count();
                black_box(inside);
            });
        });

        group.bench_with_input(
            BenchmarkId::new("in_volume", furniture),
            &furniture,
            |b, _| {
                b.iter(|| {
                    let inside = points
                        .iter()
                        .filter(|p| room.is_position_in_scene_volume(**p))
                        .count();
                    black_box(inside);
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("raycast", furniture), &furniture, |b, _| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter_map(|p| room.raycast(&Ray::new(*p, Vec3::NEG_Y), 10.0))
                    .count();
                black_box(hits);
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_benches, query_benches
}
criterion_main!(benches);
