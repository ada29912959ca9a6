// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
use ascent_gen::{CountRange, GeneratorConfig, Generator, JumpData, JumpMetadata, MemoryJumpSource, Trajectory, WorldDataset};
use ascent_geom::{encode_kcl, CollisionCache, MemoryMeshSource, Prng, Triangle, Vec3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn slab(half: f32) -> Vec<Triangle> {
    let a = Vec3::new(-half, 0.0, -half);
    let b = Vec3::new(-half, 0.0, half);
    let c = Vec3::new(half, 0.0, -half);
    let d = Vec3::new(half, 0.0, half);
    vec![Triangle::new(a, b, c), Triangle::new(c, b, d)]
}

/// Steps a short arc forward; yaw decides the direction.
fn arc() -> Trajectory {
    Trajectory::new((0u8..=12).map(|i| {
        let t = f32::from(i) / 12.0;
        Vec3::new(0.0, 1200.0 * t * (1.0 - t), 900.0 * t)
    }))
    .unwrap()
}

fn bench_generate(c: &mut Criterion) {
    let cache = CollisionCache::new(
        MemoryMeshSource::new()
            .with("Slab", encode_kcl(&[slab(300.0)]).unwrap().to_vec())
            .with("Wide", encode_kcl(&[slab(700.0)]).unwrap().to_vec()),
    );
    let jump = JumpData { name: "arc".into(), metadata: JumpMetadata::default(), leading: arc(), following: arc() };
    let jumps = MemoryJumpSource::new().with("Default", vec![jump]);
    let mut config = GeneratorConfig {
        final_object: "Wide".into(),
        timer_excluded_worlds: vec!["BenchWorld".into()],
        max_reverts: Some(500),
        ..GeneratorConfig::default()
    };
    config.segment_counts.default = CountRange::new(4, 6);

    let mut group = c.benchmark_group("generate");
    group.sample_size(20);
    for &target in &[8usize, 16] {
        let mut world = WorldDataset::new("BenchWorld", vec!["Slab".into(), "Wide".into()]);
        world.start_object = "Wide".into();
        world.target_object_count = target;
        let generator = Generator::new(&config, &cache, &jumps);
        group.bench_with_input(BenchmarkId::from_parameter(target), &world, |b, world| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                // A capped run may give up; the time spent is what is measured.
                black_box(generator.generate(Vec3::ZERO, world, &mut Prng::from_seed_u64(seed)).ok())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
