mod util;

use mesh_flux::prelude::*;
use mesh_flux::topology::link_status_from_nodes;
use proptest::prelude::*;
use util::{assert_mesh_invariants, jittered_cloud, random_values};

fn node_status() -> impl Strategy<Value = NodeStatus> {
    prop_oneof![
        Just(NodeStatus::Core),
        Just(NodeStatus::FixedValue),
        Just(NodeStatus::FixedGradient),
        Just(NodeStatus::Closed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn clouds_build_valid_meshes(n in 12usize..90, seed in any::<u64>()) {
        let mesh = Mesh::from_points(&jittered_cloud(n, seed)).unwrap();
        assert_mesh_invariants(&mesh);
    }

    #[test]
    fn point_lattices_build_valid_meshes(rows in 3usize..10, cols in 3usize..10, dx in 0.1f64..50.0, dy in 0.1f64..50.0) {
        let pts: Vec<(f64, f64)> = (0..rows * cols)
            .map(|k| ((k % cols) as f64 * dx, (k / cols) as f64 * dy))
            .collect();
        let mesh = Mesh::from_points(&pts).unwrap();
        assert_mesh_invariants(&mesh);
        prop_assert_eq!(mesh.connectivity().number_of_cells(), (rows - 2) * (cols - 2));
    }

    #[test]
    fn rings_build_valid_meshes(n in 8usize..64, r in 0.5f64..100.0, centred in any::<bool>()) {
        let mut pts: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let a = std::f64::consts::TAU * k as f64 / n as f64;
                (r * a.cos(), r * a.sin())
            })
            .collect();
        if centred {
            pts.push((0.0, 0.0));
        }
        let mesh = Mesh::from_points(&pts).unwrap();
        assert_mesh_invariants(&mesh);
        prop_assert_eq!(mesh.connectivity().number_of_cells(), usize::from(centred));
    }

    #[test]
    fn rasters_build_valid_meshes(rows in 2usize..9, cols in 2usize..9, dx in 0.1f64..50.0, dy in 0.1f64..50.0) {
        let mesh = Mesh::raster(RasterShape { rows, cols, dx, dy, origin: [0.0, 0.0] }).unwrap();
        assert_mesh_invariants(&mesh);
        let conn = mesh.connectivity();
        prop_assert_eq!(conn.number_of_cells(), (rows - 2) * (cols - 2));
        prop_assert_eq!(conn.number_of_links(), rows * (cols - 1) + cols * (rows - 1));
        prop_assert_eq!(conn.perimeter_nodes().len(), 2 * (rows + cols) - 4);
    }

    #[test]
    fn divergence_is_zero_off_cells(seed in any::<u64>()) {
        let mesh = Mesh::from_points(&jittered_cloud(36, seed)).unwrap();
        let conn = mesh.connectivity();
        let q = random_values(conn.number_of_links(), -10.0, 10.0, seed ^ 0x5eed);
        let div = calc_flux_div_at_node(conn, &q, None).unwrap();
        for (n, d) in div.iter().enumerate() {
            if !conn.node_has_cell(n) {
                prop_assert_eq!(*d, 0.0);
            }
        }
    }

    #[test]
    fn gradient_is_linear(seed in any::<u64>(), a in -3.0f64..3.0) {
        let mesh = Mesh::raster_uniform(5, 6, 2.0).unwrap();
        let conn = mesh.connectivity();
        let u = random_values(30, -1.0, 1.0, seed);
        let v = random_values(30, -1.0, 1.0, seed.wrapping_add(1));
        let w: Vec<f64> = u.iter().zip(&v).map(|(u, v)| a * u + v).collect();
        let gu = calc_grad_at_link(conn, &u, None).unwrap();
        let gv = calc_grad_at_link(conn, &v, None).unwrap();
        let gw = calc_grad_at_link(conn, &w, None).unwrap();
        for l in 0..conn.number_of_links() {
            prop_assert!((gw[l] - (a * gu[l] + gv[l])).abs() < 1e-12);
        }
    }

    #[test]
    fn link_status_tracks_endpoints(statuses in proptest::collection::vec(node_status(), 9)) {
        // 5x5 raster: the 3x3 interior owns cells, so any status is legal there.
        let mut mesh = Mesh::raster_uniform(5, 5, 1.0).unwrap();
        let interior = [6, 7, 8, 11, 12, 13, 16, 17, 18];
        for (&n, &s) in interior.iter().zip(&statuses) {
            mesh.set_status_at_node(n, s).unwrap();
        }
        let conn = mesh.connectivity();
        let status = mesh.status();
        for l in 0..conn.number_of_links() {
            let [t, h] = conn.nodes_at_link(l);
            let want = link_status_from_nodes(status.status_at_node()[t], status.status_at_node()[h]);
            prop_assert_eq!(status.status_at_link()[l], want);
            prop_assert_eq!(status.active_links().contains(&l), want == LinkStatus::Active);
        }
    }
}
