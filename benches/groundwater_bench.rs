use criterion::{Criterion, criterion_group, criterion_main};

use mesh_flux::physics::groundwater::{TOPOGRAPHIC_ELEVATION, WATER_TABLE_ELEVATION};
use mesh_flux::prelude::*;

fn hillslope(side: usize) -> (Mesh, DupuitPercolator) {
    let mut mesh = Mesh::raster_uniform(side, side, 10.0).unwrap();
    mesh.set_closed_boundaries(true, true, false, true).unwrap();
    let x = mesh.connectivity().x_of_node();
    let fields = mesh.fields_mut();
    fields
        .add_field(ElementKind::Node, TOPOGRAPHIC_ELEVATION, x.iter().map(|x| 5.0 + 0.01 * x).collect(), false)
        .unwrap();
    fields
        .add_field(ElementKind::Node, WATER_TABLE_ELEVATION, x.iter().map(|x| 2.0 + 0.005 * x).collect(), false)
        .unwrap();
    let gw = DupuitPercolator::new(&mut mesh, DupuitConfig::default()).unwrap();
    (mesh, gw)
}

fn bench_dupuit(c: &mut Criterion) {
    let (mut mesh, mut gw) = hillslope(64);
    c.bench_function("dupuit_step_fixed_64", |b| {
        b.iter(|| gw.step_fixed(&mut mesh, 60.0).unwrap())
    });
    let (mut mesh, mut gw) = hillslope(32);
    c.bench_function("dupuit_step_adaptive_32", |b| {
        b.iter(|| gw.step_adaptive(&mut mesh, 3600.0, 0.5).unwrap())
    });
}

criterion_group!(benches, bench_dupuit);
criterion_main!(benches);
