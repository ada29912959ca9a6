// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
use ascent_geom::{encode_kcl, CollisionMesh, CollisionModel, Prng, Triangle, Vec3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Rolling terrain of `side * side` cells, two triangles each.
fn terrain(side: u16) -> Vec<Triangle> {
    let h = |x: u16, z: u16| (f32::from(x) * 0.7).sin() * 40.0 + (f32::from(z) * 0.3).cos() * 25.0;
    let p = |x: u16, z: u16| Vec3::new(f32::from(x) * 100.0, h(x, z), f32::from(z) * 100.0);
    let mut tris = Vec::with_capacity(usize::from(side) * usize::from(side) * 2);
    for x in 0..side {
        for z in 0..side {
            tris.push(Triangle::new(p(x, z), p(x, z + 1), p(x + 1, z)));
            tris.push(Triangle::new(p(x + 1, z), p(x, z + 1), p(x + 1, z + 1)));
        }
    }
    tris
}

fn probes(side: u16, n: usize) -> Vec<Vec3> {
    let extent = f32::from(side) * 100.0;
    let mut rng = Prng::from_seed_u64(0xA5CE_0001);
    (0..n)
        .map(|_| Vec3::new(rng.uniform(0.0, extent), rng.uniform(-100.0, 400.0), rng.uniform(0.0, extent)))
        .collect()
}

fn bench_intersects(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_intersects");
    for &side in &[8u16, 32, 128] {
        let mesh = CollisionMesh::from_triangles(terrain(side)).unwrap();
        let points = probes(side, 256);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(mesh.triangles().len()), &points, |b, pts| {
            b.iter(|| pts.iter().filter(|&&p| mesh.intersects(p, 180.0)).count());
        });
    }
    group.finish();
}

fn bench_standable(c: &mut Criterion) {
    let model = CollisionModel::from_mesh(CollisionMesh::from_triangles(terrain(32)).unwrap());
    c.bench_function("standable_position", |b| {
        let mut rng = Prng::from_seed_u64(7);
        b.iter(|| black_box(model.standable_position(180.0, Vec3::UNIT_Y, 45.0, 10_000, &mut rng)));
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode_kcl(&[terrain(64)]).unwrap();
    c.bench_function("kcl_decode_64x64", |b| {
        b.iter(|| black_box(CollisionModel::from_kcl(&bytes).unwrap()));
    });
}

criterion_group!(benches, bench_intersects, bench_standable, bench_decode);
criterion_main!(benches);
