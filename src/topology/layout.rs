//! The construction capability shared by every mesh variant.
//!
//! A [`MeshLayout`] supplies node coordinates and the primal polygons; the
//! connectivity builder derives everything else. Dual geometry is delegated
//! back to the layout so that structured lattices can answer in closed form
//! while unstructured tessellations compute it from perpendicular bisectors
//! (the default methods).

use crate::geometry::metrics::{centroid, circumcenter, distance, polygon_area};

/// Source of primal elements and dual geometry for
/// [`Connectivity::build`](crate::topology::connectivity::Connectivity::build).
pub trait MeshLayout {
    /// Short human-readable variant name, used in log messages.
    fn describe(&self) -> &'static str;

    /// Node coordinates in canonical (row-major) order.
    fn node_coords(&self) -> &[[f64; 2]];

    /// Polygons as lists of node ids. Order and rotation are free; the builder
    /// canonicalises both.
    fn patches(&self) -> &[Vec<usize>];

    /// Position of the dual corner of a polygon with the given vertices.
    ///
    /// Defaults to the circumcentre for triangles and the vertex mean otherwise.
    fn corner_position(&self, vertices: &[[f64; 2]]) -> [f64; 2] {
        if vertices.len() == 3 {
            if let Some(c) = circumcenter(vertices[0], vertices[1], vertices[2]) {
                return c;
            }
        }
        centroid(vertices)
    }

    /// Width of the dual face crossing the link `tail -> head`, whose
    /// endpoints are the corners of the two polygons sharing the link.
    fn face_width(&self, _tail: [f64; 2], _head: [f64; 2], corners: [[f64; 2]; 2]) -> f64 {
        distance(corners[0], corners[1])
    }

    /// Area of the dual cell around `node`, bounded by `corners` in
    /// counter-clockwise order.
    fn cell_area(&self, _node: [f64; 2], corners: &[[f64; 2]]) -> f64 {
        polygon_area(corners)
    }
}
