mod util;

use mesh_flux::prelude::*;
use util::{assert_mesh_invariants, jittered_cloud};

const B: usize = BAD_INDEX;

fn raster_3x4() -> Mesh {
    Mesh::raster_uniform(3, 4, 10.0).unwrap()
}

#[test]
fn raster_counts_match_lattice() {
    let mesh = raster_3x4();
    let conn = mesh.connectivity();
    assert_eq!(conn.number_of_nodes(), 12);
    assert_eq!(conn.number_of_links(), 17);
    assert_eq!(conn.number_of_patches(), 6);
    assert_eq!(conn.number_of_cells(), 2);
    assert_eq!(conn.number_of_faces(), 7);
    assert_eq!(conn.number_of_corners(), 6);
    assert_eq!(conn.node_at_cell(), &[5, 6]);
    assert_eq!(conn.link_at_face(), &[4, 5, 7, 8, 9, 11, 12]);
    assert_mesh_invariants(&mesh);
}

#[test]
fn raster_links_are_row_major() {
    let mesh = raster_3x4();
    let conn = mesh.connectivity();
    assert_eq!(&conn.node_at_link_tail()[..7], &[0, 1, 2, 0, 1, 2, 3]);
    assert_eq!(&conn.node_at_link_head()[..7], &[1, 2, 3, 4, 5, 6, 7]);
    assert!(conn.length_of_link().iter().all(|&l| l == 10.0));
}

#[test]
fn links_at_node_run_counter_clockwise_from_east() {
    let mesh = raster_3x4();
    let conn = mesh.connectivity();
    assert_eq!(conn.links_at_node().width(), 4);
    assert_eq!(conn.links_at_node().row(5), &[8, 11, 7, 4]);
    assert_eq!(conn.link_dirs_at_node().row(5), &[-1, -1, 1, 1]);
    assert_eq!(conn.links_at_node().row(0), &[0, 3, B, B]);
    assert_eq!(conn.link_dirs_at_node().row(0), &[-1, -1, 0, 0]);
    assert_eq!(conn.links_at_node().row(11), &[16, 13, B, B]);
    assert_eq!(conn.adjacent_nodes_at_node().row(5), &[6, 9, 4, 1]);
}

#[test]
fn patches_and_their_links() {
    let mesh = raster_3x4();
    let conn = mesh.connectivity();
    assert_eq!(conn.nodes_at_patch().row(0), &[5, 4, 0, 1]);
    assert_eq!(conn.links_at_patch().row(0), &[4, 7, 3, 0]);
    assert_eq!(conn.patches_at_link().row(0), &[0, B]);
    assert_eq!(conn.patches_at_link().row(4), &[0, 1]);
    assert_eq!(conn.patches_at_link().row(7), &[3, 0]);
    assert_eq!(conn.patches_at_node().row(5), &[4, 3, 0, 1]);
}

#[test]
fn raster_dual_geometry_is_closed_form() {
    let mesh = Mesh::raster(RasterShape {
        rows: 4,
        cols: 5,
        dx: 2.0,
        dy: 3.0,
        origin: [1.0, -1.0],
    })
    .unwrap();
    let conn = mesh.connectivity();
    assert!(conn.area_of_cell().iter().all(|&a| a == 6.0));
    for (f, &l) in conn.link_at_face().iter().enumerate() {
        let [t, h] = conn.nodes_at_link(l);
        let horizontal = conn.xy_of_node()[t][1] == conn.xy_of_node()[h][1];
        assert_eq!(conn.width_of_face()[f], if horizontal { 3.0 } else { 2.0 });
    }
    assert_eq!(conn.xy_of_corner()[0], [2.0, 0.5]);
    assert_mesh_invariants(&mesh);
}

#[test]
fn cell_faces_and_corners() {
    let mesh = raster_3x4();
    let conn = mesh.connectivity();
    assert_eq!(conn.faces_at_cell().row(0), &[3, 5, 2, 0]);
    assert_eq!(conn.corners_at_cell().row(0), &[4, 3, 0, 1]);
    assert_eq!(conn.corners_at_face().row(0), &[0, 1]);
    assert_eq!(conn.x_of_corner()[..3], [5.0, 15.0, 25.0]);
    assert_eq!(conn.y_of_corner()[3], 15.0);
    assert_eq!(conn.corner_at_patch(4), 4);
    assert_eq!(conn.patch_at_corner(2), 2);
}

#[test]
fn perimeter_walks_counter_clockwise() {
    let mesh = raster_3x4();
    assert_eq!(
        mesh.connectivity().perimeter_nodes(),
        &[0, 1, 2, 3, 7, 11, 10, 9, 8, 4]
    );
}

#[test]
fn degenerate_rasters_fail() {
    for (rows, cols, spacing) in [(1, 4, 1.0), (4, 1, 1.0), (3, 3, -1.0), (3, 3, f64::INFINITY)] {
        assert!(matches!(
            Mesh::raster_uniform(rows, cols, spacing),
            Err(MeshError::MalformedTopology { .. })
        ));
    }
}

#[test]
fn voronoi_of_square_with_centre() {
    let pts = [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0), (1.0, 1.0)];
    let mesh = Mesh::from_points(&pts).unwrap();
    let conn = mesh.connectivity();
    assert_eq!(mesh.input_index(), Some(&[0, 1, 4, 2, 3][..]));
    assert_eq!(conn.number_of_patches(), 4);
    assert_eq!(conn.number_of_links(), 8);
    assert_eq!(conn.node_at_cell(), &[2]);
    assert!((conn.area_of_cell()[0] - 2.0).abs() < 1e-12);
    assert_eq!(conn.number_of_faces(), 4);
    for &w in conn.width_of_face() {
        assert!((w - 2f64.sqrt()).abs() < 1e-12);
    }
    assert_eq!(conn.perimeter_nodes(), &[0, 1, 4, 3]);
    assert_mesh_invariants(&mesh);
}

#[test]
fn random_clouds_satisfy_invariants() {
    for seed in [1, 7, 42, 2024] {
        let mesh = Mesh::from_points(&jittered_cloud(60, seed)).unwrap();
        assert_mesh_invariants(&mesh);
        assert!(mesh.connectivity().number_of_cells() > 0);
    }
}

fn ring(n: usize, r: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let a = std::f64::consts::TAU * k as f64 / n as f64;
            (r * a.cos(), r * a.sin())
        })
        .collect()
}

#[test]
fn exact_lattices_give_unit_cells() {
    for side in 3..=12usize {
        let pts: Vec<(f64, f64)> = (0..side * side)
            .map(|k| ((k % side) as f64, (k / side) as f64))
            .collect();
        let mesh = Mesh::from_points(&pts).unwrap();
        assert_mesh_invariants(&mesh);
        let conn = mesh.connectivity();
        assert_eq!(conn.number_of_cells(), (side - 2) * (side - 2));
        assert_eq!(conn.number_of_patches(), 2 * (side - 1) * (side - 1));
        for &a in conn.area_of_cell() {
            assert!((a - 1.0).abs() < 1e-9, "side {side}: cell area {a}");
        }
    }
}

#[test]
fn cocircular_rings_build() {
    let mesh = Mesh::from_points(&ring(40, 10.0)).unwrap();
    assert_mesh_invariants(&mesh);
    assert_eq!(mesh.connectivity().number_of_patches(), 38);
    assert_eq!(mesh.connectivity().number_of_cells(), 0);

    let mut pts = ring(40, 10.0);
    pts.push((0.3, 0.1));
    let mesh = Mesh::from_points(&pts).unwrap();
    assert_mesh_invariants(&mesh);
    let conn = mesh.connectivity();
    assert_eq!(conn.number_of_cells(), 1);
    let centre = conn.node_at_cell()[0];
    assert_eq!(conn.xy_of_node()[centre], [0.3, 0.1]);
}

#[test]
fn arc_with_centre_builds() {
    let mut pts: Vec<(f64, f64)> = (0..30)
        .map(|k| {
            let a = std::f64::consts::FRAC_PI_2 * k as f64 / 29.0;
            (100.0 * a.cos(), 100.0 * a.sin())
        })
        .collect();
    pts.push((0.0, 0.0));
    let mesh = Mesh::from_points(&pts).unwrap();
    assert_mesh_invariants(&mesh);
    assert_eq!(mesh.connectivity().number_of_patches(), 29);
}

#[test]
fn nearly_flat_hull_keeps_every_node() {
    let mut pts: Vec<(f64, f64)> = (0..=10).map(|i| (i as f64, 0.0)).collect();
    pts.push((5.0, 1e-3));
    let mesh = Mesh::from_points(&pts).unwrap();
    assert_mesh_invariants(&mesh);
    let conn = mesh.connectivity();
    assert_eq!(conn.number_of_patches(), 10);
    assert_eq!(conn.perimeter_nodes().len(), 12);
}

#[test]
fn rectangle_with_straight_sides() {
    let (w, h) = (6usize, 3usize);
    let mut pts: Vec<(f64, f64)> = Vec::new();
    for j in 0..=h {
        for i in 0..=w {
            if i == 0 || j == 0 || i == w || j == h {
                pts.push((i as f64, j as f64));
            }
        }
    }
    for j in 0..h {
        for i in 0..w {
            pts.push((i as f64 + 0.4, j as f64 + 0.6));
        }
    }
    let mesh = Mesh::from_points(&pts).unwrap();
    assert_mesh_invariants(&mesh);
    let conn = mesh.connectivity();
    assert_eq!(conn.perimeter_nodes().len(), 2 * (w + h));
    assert_eq!(conn.number_of_cells(), w * h);
}

#[test]
fn bad_point_sets_are_malformed() {
    let cases: [&[(f64, f64)]; 4] = [
        &[(0.0, 0.0), (1.0, 0.0)],
        &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
        &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)],
        &[(0.0, 0.0), (f64::NAN, 0.0), (0.0, 1.0)],
    ];
    for pts in cases {
        assert!(matches!(
            Mesh::from_points(pts),
            Err(MeshError::MalformedTopology { .. })
        ));
    }
}

#[test]
fn rebuild_drops_resized_fields() {
    let mut mesh = Mesh::from_points(&jittered_cloud(16, 3)).unwrap();
    mesh.fields_mut()
        .add_zeros(ElementKind::Node, "z", false)
        .unwrap();
    let before = mesh.connectivity().number_of_nodes();

    assert!(mesh.rebuild_from_points(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)]).is_err());
    assert_eq!(mesh.connectivity().number_of_nodes(), before);
    assert!(mesh.fields().has_field(ElementKind::Node, "z"));

    let dropped = mesh.rebuild_from_points(&jittered_cloud(25, 3)).unwrap();
    assert!(dropped.contains(&(ElementKind::Node, "z".to_string())));
    assert_eq!(mesh.fields().count(ElementKind::Node), 25);
    assert_mesh_invariants(&mesh);
}
