use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_flux::prelude::*;

fn cloud(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let side = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|k| {
            (
                (k % side) as f64 + rng.gen_range(0.1..0.9),
                (k / side) as f64 + rng.gen_range(0.1..0.9),
            )
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &side in &[32usize, 64] {
        group.bench_with_input(BenchmarkId::new("raster", side), &side, |b, &side| {
            b.iter(|| Mesh::raster_uniform(side, side, 1.0).unwrap())
        });
    }
    for &n in &[256usize, 1024] {
        let pts = cloud(n, 7);
        group.bench_with_input(BenchmarkId::new("voronoi", n), &pts, |b, pts| {
            b.iter(|| Mesh::from_points(black_box(pts)).unwrap())
        });
    }
    group.finish();
}

fn bench_operators(c: &mut Criterion) {
    let mesh = Mesh::raster_uniform(128, 128, 1.0).unwrap();
    let conn = mesh.connectivity();
    let mut rng = SmallRng::seed_from_u64(3);
    let z: Vec<f64> = (0..conn.number_of_nodes()).map(|_| rng.gen_range(0.0..1.0)).collect();
    let mut grad = vec![0.0; conn.number_of_links()];
    let mut div = vec![0.0; conn.number_of_nodes()];

    c.bench_function("grad_at_link_128", |b| {
        b.iter(|| {
            calc_grad_at_link(conn, black_box(&z), Some(grad.as_mut_slice())).unwrap();
        })
    });
    c.bench_function("flux_div_at_node_128", |b| {
        b.iter(|| {
            calc_flux_div_at_node(conn, black_box(&grad), Some(div.as_mut_slice())).unwrap();
        })
    });
}

criterion_group!(benches, bench_build, bench_operators);
criterion_main!(benches);
