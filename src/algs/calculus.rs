//! Discrete differential operators on the primal/dual mesh.
//!
//! All operators are linear, ignore boundary status, and evaluate in a fixed
//! order, so repeated calls on the same input are bit-identical. Each takes
//! an optional output buffer (see [`FieldOutput`]).

use crate::data::output::{FieldOutput, check_len, prepare_output};
use crate::mesh_error::MeshError;
use crate::topology::connectivity::Connectivity;
use crate::topology::element::{BAD_INDEX, ElementKind};

/// Difference `v[head] - v[tail]` along every link.
pub fn calc_diff_at_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    check_len(ElementKind::Node, values_at_node, conn.number_of_nodes())?;
    let mut out = prepare_output(out, ElementKind::Link, conn.number_of_links())?;
    for (l, (&t, &h)) in conn
        .node_at_link_tail()
        .iter()
        .zip(conn.node_at_link_head())
        .enumerate()
    {
        out[l] = values_at_node[h] - values_at_node[t];
    }
    Ok(out)
}

/// Gradient `(v[head] - v[tail]) / length` along every link.
pub fn calc_grad_at_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    let mut out = calc_diff_at_link(conn, values_at_node, out)?;
    for (g, &len) in out.iter_mut().zip(conn.length_of_link()) {
        *g /= len;
    }
    Ok(out)
}

/// Net outflow through the faces of each cell: `Σ -dir × q × width`.
///
/// Positive values mean more leaves the cell than enters it. Nodes without a
/// cell get exactly `0.0`.
pub fn calc_net_flux_at_node<'a>(
    conn: &Connectivity,
    flux_at_link: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    check_len(ElementKind::Link, flux_at_link, conn.number_of_links())?;
    let mut out = prepare_output(out, ElementKind::Node, conn.number_of_nodes())?;
    let links = conn.links_at_node();
    let dirs = conn.link_dirs_at_node();
    let face_at_link = conn.face_at_link();
    let width = conn.width_of_face();
    for (n, slot) in out.iter_mut().enumerate() {
        if !conn.node_has_cell(n) {
            *slot = 0.0;
            continue;
        }
        let mut net = 0.0;
        for (&l, &d) in links.row(n).iter().zip(dirs.row(n)) {
            if l == BAD_INDEX {
                continue;
            }
            let f = face_at_link[l];
            if f != BAD_INDEX {
                net -= f64::from(d) * flux_at_link[l] * width[f];
            }
        }
        *slot = net;
    }
    Ok(out)
}

/// Flux divergence: net outflow divided by cell area, `0.0` without a cell.
pub fn calc_flux_div_at_node<'a>(
    conn: &Connectivity,
    flux_at_link: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    let mut out = calc_net_flux_at_node(conn, flux_at_link, out)?;
    let cell_at_node = conn.cell_at_node();
    let area = conn.area_of_cell();
    for (slot, &c) in out.iter_mut().zip(cell_at_node) {
        if c != BAD_INDEX {
            *slot /= area[c];
        }
    }
    Ok(out)
}
