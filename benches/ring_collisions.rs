//! Benchmarks for the CPU-side ring simulation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use antimatter::collision::{detect_ring_collisions, Chamber};
use antimatter::config::RingConfig;
use antimatter::particle::{orbit_position, Direction, Particle, ParticleKind};
use antimatter::prelude::*;

fn beam(kind: ParticleKind, direction: Direction, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            Particle::orbiting(kind, 200.0, angle, 0.01, direction, 1.5, Vec4::ONE)
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_ring_collisions");
    let chambers: Vec<Chamber> = [0.0f32, 1.57, 3.14, 4.71]
        .iter()
        .map(|&a| Chamber {
            center: orbit_position(200.0, a),
            radius: 30.0,
        })
        .collect();

    for count in [100, 500, 1000] {
        let matter = beam(ParticleKind::Matter, Direction::Forward, count);
        let anti = beam(ParticleKind::Antimatter, Direction::Reverse, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| detect_ring_collisions(black_box(&matter), black_box(&anti), &chambers, 5.0))
        });
    }
    group.finish();
}

fn bench_ring_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_step");
    for count in [100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut ring = AcceleratorRing::with_seed(
                RingConfig {
                    particles_per_beam: count,
                    ..RingConfig::default()
                },
                1,
            );
            let step = FrameStep::new(1.0 / 60.0, 1.0);
            b.iter(|| ring.step(black_box(&step)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect, bench_ring_step);
criterion_main!(benches);
