//! Mappers from node values to link values.

use crate::data::output::{FieldOutput, check_len, prepare_output};
use crate::mesh_error::MeshError;
use crate::topology::connectivity::Connectivity;
use crate::topology::element::ElementKind;

fn map_link_nodes<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
    f: impl Fn(f64, f64) -> f64,
) -> Result<FieldOutput<'a>, MeshError> {
    check_len(ElementKind::Node, values_at_node, conn.number_of_nodes())?;
    let mut out = prepare_output(out, ElementKind::Link, conn.number_of_links())?;
    for (slot, (&t, &h)) in out
        .iter_mut()
        .zip(conn.node_at_link_tail().iter().zip(conn.node_at_link_head()))
    {
        *slot = f(values_at_node[t], values_at_node[h]);
    }
    Ok(out)
}

/// Mean of the two endpoint values.
pub fn map_mean_of_link_nodes_to_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    map_link_nodes(conn, values_at_node, out, |t, h| 0.5 * (t + h))
}

/// Value at the head node.
pub fn map_link_head_node_to_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    map_link_nodes(conn, values_at_node, out, |_, h| h)
}

/// Value at the tail node.
pub fn map_link_tail_node_to_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    map_link_nodes(conn, values_at_node, out, |t, _| t)
}

pub fn map_max_of_link_nodes_to_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    map_link_nodes(conn, values_at_node, out, f64::max)
}

pub fn map_min_of_link_nodes_to_link<'a>(
    conn: &Connectivity,
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    map_link_nodes(conn, values_at_node, out, f64::min)
}

/// Upwind map: `values` at whichever endpoint has the larger `control`.
///
/// Ties go to the tail.
pub fn map_value_at_max_node_to_link<'a>(
    conn: &Connectivity,
    control_at_node: &[f64],
    values_at_node: &[f64],
    out: Option<&'a mut [f64]>,
) -> Result<FieldOutput<'a>, MeshError> {
    let n_nodes = conn.number_of_nodes();
    check_len(ElementKind::Node, control_at_node, n_nodes)?;
    check_len(ElementKind::Node, values_at_node, n_nodes)?;
    let mut out = prepare_output(out, ElementKind::Link, conn.number_of_links())?;
    for (slot, (&t, &h)) in out
        .iter_mut()
        .zip(conn.node_at_link_tail().iter().zip(conn.node_at_link_head()))
    {
        let upwind = if control_at_node[h] > control_at_node[t] { h } else { t };
        *slot = values_at_node[upwind];
    }
    Ok(out)
}
