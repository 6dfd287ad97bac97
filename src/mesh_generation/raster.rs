//! Structured rectangular lattice.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;
use crate::topology::layout::MeshLayout;

/// One side of a rectangular lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Right,
    Top,
    Left,
    Bottom,
}

impl Side {
    /// Sides in the order used by `set_closed_boundaries`.
    pub const ALL: [Side; 4] = [Side::Right, Side::Top, Side::Left, Side::Bottom];
}

/// Shape of a raster: node counts, spacings and lower-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterShape {
    /// Node rows (along `y`).
    pub rows: usize,
    /// Node columns (along `x`).
    pub cols: usize,
    pub dx: f64,
    pub dy: f64,
    #[serde(default)]
    pub origin: [f64; 2],
}

impl RasterShape {
    /// Square spacing, origin at `(0, 0)`.
    pub fn uniform(rows: usize, cols: usize, spacing: f64) -> Self {
        Self {
            rows,
            cols,
            dx: spacing,
            dy: spacing,
            origin: [0.0, 0.0],
        }
    }

    pub fn number_of_nodes(&self) -> usize {
        self.rows * self.cols
    }

    /// Node at row `r`, column `c`.
    #[inline]
    pub fn node_at(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Nodes on `side`, ascending. Corner nodes belong to both adjacent sides.
    pub fn nodes_on_side(&self, side: Side) -> Vec<usize> {
        match side {
            Side::Bottom => (0..self.cols).collect(),
            Side::Top => (0..self.cols)
                .map(|c| self.node_at(self.rows - 1, c))
                .collect(),
            Side::Left => (0..self.rows).map(|r| self.node_at(r, 0)).collect(),
            Side::Right => (0..self.rows)
                .map(|r| self.node_at(r, self.cols - 1))
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), MeshError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(MeshError::malformed(format!(
                "raster needs at least 2 rows and 2 columns, got {}x{}",
                self.rows, self.cols
            )));
        }
        for (name, d) in [("dx", self.dx), ("dy", self.dy)] {
            if !(d.is_finite() && d > 0.0) {
                return Err(MeshError::malformed(format!(
                    "raster spacing {name} must be positive and finite, got {d}"
                )));
            }
        }
        if !(self.origin[0].is_finite() && self.origin[1].is_finite()) {
            return Err(MeshError::malformed("raster origin must be finite"));
        }
        Ok(())
    }
}

/// [`MeshLayout`] of a raster: quadrilateral patches and closed-form dual
/// geometry (rectangular cells centred on nodes).
#[derive(Clone, Debug)]
pub struct RasterLayout {
    shape: RasterShape,
    coords: Vec<[f64; 2]>,
    patches: Vec<Vec<usize>>,
}

impl RasterLayout {
    pub fn new(shape: RasterShape) -> Result<Self, MeshError> {
        shape.validate()?;
        let RasterShape {
            rows,
            cols,
            dx,
            dy,
            origin,
        } = shape;

        let mut coords = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let y = origin[1] + dy * r as f64;
            for c in 0..cols {
                coords.push([origin[0] + dx * c as f64, y]);
            }
        }

        let mut patches = Vec::with_capacity((rows - 1) * (cols - 1));
        for r in 0..rows - 1 {
            for c in 0..cols - 1 {
                let v0 = shape.node_at(r, c);
                let v3 = v0 + cols;
                patches.push(vec![v0, v0 + 1, v3 + 1, v3]);
            }
        }

        Ok(Self {
            shape,
            coords,
            patches,
        })
    }

    pub fn shape(&self) -> &RasterShape {
        &self.shape
    }
}

impl MeshLayout for RasterLayout {
    fn describe(&self) -> &'static str {
        "raster"
    }

    fn node_coords(&self) -> &[[f64; 2]] {
        &self.coords
    }

    fn patches(&self) -> &[Vec<usize>] {
        &self.patches
    }

    fn corner_position(&self, vertices: &[[f64; 2]]) -> [f64; 2] {
        crate::geometry::metrics::centroid(vertices)
    }

    fn face_width(&self, tail: [f64; 2], head: [f64; 2], _corners: [[f64; 2]; 2]) -> f64 {
        if (head[1] - tail[1]).abs() < 0.5 * self.shape.dy {
            self.shape.dy
        } else {
            self.shape.dx
        }
    }

    fn cell_area(&self, _node: [f64; 2], _corners: &[[f64; 2]]) -> f64 {
        self.shape.dx * self.shape.dy
    }
}
