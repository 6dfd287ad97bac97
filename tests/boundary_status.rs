use mesh_flux::prelude::*;
use mesh_flux::topology::link_status_from_nodes;
use NodeStatus::*;

/// Interior link 5 -> 6 of a 4x4 raster; both endpoints own cells.
const LINK: usize = 8;

#[test]
fn defaults_follow_perimeter() {
    let mesh = Mesh::raster_uniform(4, 4, 1.0).unwrap();
    let status = mesh.status();
    assert_eq!(status.core_nodes(), &[5, 6, 9, 10]);
    assert_eq!(status.boundary_nodes().len(), 12);
    assert_eq!(status.fixed_value_boundary_nodes().len(), 12);
    assert!(status.closed_boundary_nodes().is_empty());
    assert_eq!(status.active_links().len(), mesh.connectivity().number_of_links());
}

#[test]
fn all_sixteen_status_pairs() {
    let expected = |t: NodeStatus, h: NodeStatus| match (t, h) {
        (Closed, _) | (_, Closed) => LinkStatus::Inactive,
        (FixedGradient, FixedGradient) => LinkStatus::Active,
        (FixedGradient, _) | (_, FixedGradient) => LinkStatus::Fixed,
        _ => LinkStatus::Active,
    };
    let mut mesh = Mesh::raster_uniform(4, 4, 1.0).unwrap();
    assert_eq!(mesh.connectivity().nodes_at_link(LINK), [5, 6]);
    let mut seen = 0;
    for tail in NodeStatus::ALL {
        for head in NodeStatus::ALL {
            mesh.set_status_at_node(5, tail).unwrap();
            mesh.set_status_at_node(6, head).unwrap();
            let got = mesh.status().status_at_link()[LINK];
            assert_eq!(got, expected(tail, head), "{tail:?} -> {head:?}");
            assert_eq!(got, link_status_from_nodes(tail, head));
            seen += 1;
        }
    }
    assert_eq!(seen, 16);
}

#[test]
fn closing_perimeter_deactivates_incident_links_immediately() {
    let mut mesh = Mesh::raster_uniform(4, 5, 1.0).unwrap();
    let conn = mesh.connectivity().clone();
    mesh.set_perimeter_status(Closed).unwrap();
    let status = mesh.status();
    for &l in status.active_links() {
        let [t, h] = conn.nodes_at_link(l);
        assert!(!conn.node_is_perimeter()[t] && !conn.node_is_perimeter()[h]);
    }
    // interior links of a 4x5 raster: 2 rows of 2 horizontal + 1 row of 3 vertical
    assert_eq!(status.active_links().len(), 7);
    assert_eq!(
        status.active_links().len() + status.inactive_links().len(),
        conn.number_of_links()
    );
}

#[test]
fn active_link_dirs_mask_inactive_links() {
    let mut mesh = Mesh::raster_uniform(3, 3, 1.0).unwrap();
    mesh.set_closed_boundaries(false, false, false, true).unwrap();
    let conn = mesh.connectivity();
    // node 4: E, N, W, S where S connects to the closed bottom row
    assert_eq!(conn.link_dirs_at_node().row(4), &[-1, -1, 1, 1]);
    assert_eq!(mesh.status().active_link_dirs_at_node().row(4), &[-1, -1, 1, 0]);
}

#[test]
fn fixed_gradient_side_fixes_links() {
    let mut mesh = Mesh::raster_uniform(4, 4, 1.0).unwrap();
    mesh.set_status_at_perimeter(Side::Right, FixedGradient).unwrap();
    let status = mesh.status();
    assert_eq!(status.fixed_gradient_boundary_nodes(), &[3, 7, 11, 15]);
    let conn = mesh.connectivity();
    let fixed: Vec<[usize; 2]> = status
        .fixed_links()
        .iter()
        .map(|&l| conn.nodes_at_link(l))
        .collect();
    assert!(fixed.contains(&[6, 7]));
    assert!(fixed.contains(&[10, 11]));
    // fixed-gradient to fixed-gradient stays active
    assert!(!fixed.contains(&[7, 11]));
}

#[test]
fn mixed_edits_recompute_lists() {
    let mut mesh = Mesh::raster_uniform(5, 5, 1.0).unwrap();
    let changed = mesh
        .set_status_at_nodes_where(|n| n % 5 == 0, Closed)
        .unwrap();
    assert_eq!(changed, 5);
    mesh.set_status_at_node(12, Closed).unwrap();
    assert_eq!(mesh.status().core_nodes(), &[6, 7, 8, 11, 13, 16, 17, 18]);
    assert_eq!(mesh.status().open_boundary_nodes().len(), 11);
    assert_eq!(mesh.status().nodes_with_status(Closed), vec![0, 5, 10, 12, 15, 20]);
}

#[test]
fn statuses_serialize() {
    let json = serde_json::to_string(&NodeStatus::ALL).unwrap();
    let back: Vec<NodeStatus> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, NodeStatus::ALL.to_vec());
    let link: LinkStatus = serde_json::from_str("\"Fixed\"").unwrap();
    assert_eq!(link, LinkStatus::Fixed);
}
