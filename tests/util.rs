//! Shared helpers for integration tests.
#![allow(dead_code)]

use mesh_flux::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// `n` points on a jittered unit grid, reproducible from `seed`.
pub fn jittered_cloud(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let side = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|k| {
            let (i, j) = (k % side, k / side);
            (
                i as f64 + rng.gen_range(0.1..0.9),
                j as f64 + rng.gen_range(0.1..0.9),
            )
        })
        .collect()
}

/// Uniform values in `[lo, hi)`, reproducible from `seed`.
pub fn random_values(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

/// Structural invariants every mesh must satisfy.
pub fn assert_mesh_invariants(mesh: &Mesh) {
    let conn = mesh.connectivity();
    let n_nodes = conn.number_of_nodes();
    let n_links = conn.number_of_links();
    let n_patches = conn.number_of_patches();

    assert!(conn.number_of_cells() <= n_nodes);
    assert!(conn.number_of_faces() <= n_links);
    assert_eq!(conn.number_of_corners(), n_patches);
    // Euler characteristic of a planar disk.
    assert_eq!(n_nodes as i64 - n_links as i64 + n_patches as i64, 1);

    for n in 0..n_nodes {
        if conn.node_is_perimeter()[n] {
            assert_eq!(conn.cell_at_node()[n], BAD_INDEX, "perimeter node {n} has a cell");
        } else {
            assert_ne!(conn.cell_at_node()[n], BAD_INDEX);
        }
    }
    for (c, &n) in conn.node_at_cell().iter().enumerate() {
        assert_eq!(conn.cell_at_node()[n], c);
        assert!(conn.area_of_cell()[c] > 0.0);
    }
    for (f, &l) in conn.link_at_face().iter().enumerate() {
        assert_eq!(conn.face_at_link()[l], f);
        assert!(conn.width_of_face()[f] >= 0.0);
    }

    let xy = conn.xy_of_node();
    for l in 0..n_links {
        let [t, h] = conn.nodes_at_link(l);
        assert!(
            (xy[t][0], xy[t][1]) < (xy[h][0], xy[h][1]),
            "link {l} points left or down"
        );
        assert!(conn.length_of_link()[l] > 0.0);
    }
    for l in 1..n_links {
        let (a, b) = (conn.midpoint_of_link(l - 1), conn.midpoint_of_link(l));
        assert!((a[1], a[0]) <= (b[1], b[0]), "links {} and {l} out of order", l - 1);
    }
    for n in 1..n_nodes {
        assert!((xy[n - 1][1], xy[n - 1][0]) < (xy[n][1], xy[n][0]));
    }

    let links = conn.links_at_node();
    let dirs = conn.link_dirs_at_node();
    for n in 0..n_nodes {
        for (&l, &d) in links.row(n).iter().zip(dirs.row(n)) {
            if l == BAD_INDEX {
                assert_eq!(d, 0);
                continue;
            }
            let [t, h] = conn.nodes_at_link(l);
            match d {
                1 => assert_eq!(h, n),
                -1 => assert_eq!(t, n),
                _ => panic!("bad direction {d} at node {n}"),
            }
        }
    }
}
