//! Unstructured mesh: Delaunay triangles with their Voronoi dual.

use crate::geometry::metrics::row_major_cmp;
use crate::mesh_error::MeshError;
use crate::mesh_generation::delaunay::triangulate;
use crate::topology::layout::MeshLayout;

/// [`MeshLayout`] over an arbitrary planar point cloud.
///
/// Nodes are renumbered row-major; [`VoronoiLayout::input_index`] maps each
/// node back to the position of its point in the caller's slice. Dual
/// geometry uses the default perpendicular-bisector methods of
/// [`MeshLayout`].
#[derive(Clone, Debug)]
pub struct VoronoiLayout {
    coords: Vec<[f64; 2]>,
    input_index: Vec<usize>,
    patches: Vec<Vec<usize>>,
}

impl VoronoiLayout {
    pub fn new(points: &[(f64, f64)]) -> Result<Self, MeshError> {
        let mut input_index: Vec<usize> = (0..points.len()).collect();
        input_index.sort_by(|&a, &b| {
            row_major_cmp([points[a].0, points[a].1], [points[b].0, points[b].1])
        });
        let coords: Vec<[f64; 2]> = input_index
            .iter()
            .map(|&i| [points[i].0, points[i].1])
            .collect();
        let patches = triangulate(&coords)?
            .into_iter()
            .map(|t| t.to_vec())
            .collect();
        Ok(Self {
            coords,
            input_index,
            patches,
        })
    }

    /// Position in the construction input of every node.
    pub fn input_index(&self) -> &[usize] {
        &self.input_index
    }
}

impl MeshLayout for VoronoiLayout {
    fn describe(&self) -> &'static str {
        "voronoi"
    }

    fn node_coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    fn patches(&self) -> &[Vec<usize>] {
        &self.patches
    }
}
