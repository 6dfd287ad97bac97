//! The `Mesh` façade: connectivity, boundary status and fields in one owner.
//!
//! All mutation goes through `&mut Mesh`, so status tables can never drift
//! from the node statuses and fields can never outlive a topology change.

use crate::data::field::FieldStore;
use crate::mesh_error::MeshError;
use crate::mesh_generation::raster::{RasterLayout, RasterShape, Side};
use crate::mesh_generation::voronoi::VoronoiLayout;
use crate::topology::connectivity::Connectivity;
use crate::topology::element::ElementKind;
use crate::topology::layout::MeshLayout;
use crate::topology::status::{NodeStatus, StatusTables};

/// A planar primal/dual mesh with boundary status and named fields.
#[derive(Clone, Debug)]
pub struct Mesh {
    conn: Connectivity,
    status: StatusTables,
    fields: FieldStore,
    raster: Option<RasterShape>,
    input_index: Option<Vec<usize>>,
}

fn counts_of(conn: &Connectivity) -> [usize; 6] {
    ElementKind::ALL.map(|k| conn.count(k))
}

impl Mesh {
    /// Build from any layout. Perimeter nodes start as fixed-value, the rest
    /// as core.
    pub fn from_layout<L: MeshLayout + ?Sized>(layout: &L) -> Result<Self, MeshError> {
        let conn = Connectivity::build(layout)?;
        let status = StatusTables::new(&conn);
        let fields = FieldStore::new(counts_of(&conn));
        Ok(Self {
            conn,
            status,
            fields,
            raster: None,
            input_index: None,
        })
    }

    /// Structured lattice.
    pub fn raster(shape: RasterShape) -> Result<Self, MeshError> {
        let layout = RasterLayout::new(shape)?;
        let mut mesh = Self::from_layout(&layout)?;
        mesh.raster = Some(shape);
        Ok(mesh)
    }

    /// Square lattice with origin at `(0, 0)`.
    pub fn raster_uniform(rows: usize, cols: usize, spacing: f64) -> Result<Self, MeshError> {
        Self::raster(RasterShape::uniform(rows, cols, spacing))
    }

    /// Delaunay triangulation of `points` with its Voronoi dual.
    ///
    /// Nodes are renumbered row-major; see [`Mesh::input_index`].
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self, MeshError> {
        let layout = VoronoiLayout::new(points)?;
        let mut mesh = Self::from_layout(&layout)?;
        mesh.input_index = Some(layout.input_index().to_vec());
        Ok(mesh)
    }

    /// Re-triangulate from new points.
    ///
    /// The new topology is built completely before anything is replaced, so
    /// on error the mesh is unchanged. On success every field whose kind
    /// changed size is dropped (and returned), and statuses are reset to the
    /// defaults.
    pub fn rebuild_from_points(
        &mut self,
        points: &[(f64, f64)],
    ) -> Result<Vec<(ElementKind, String)>, MeshError> {
        let layout = VoronoiLayout::new(points)?;
        let conn = Connectivity::build(&layout)?;
        let dropped = self.fields.set_counts(counts_of(&conn));
        self.status = StatusTables::new(&conn);
        self.conn = conn;
        self.raster = None;
        self.input_index = Some(layout.input_index().to_vec());
        log::debug!("mesh rebuilt; {} fields dropped", dropped.len());
        Ok(dropped)
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.conn
    }

    pub fn status(&self) -> &StatusTables {
        &self.status
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    /// Read-only topology and status next to mutable fields.
    pub fn split_mut(&mut self) -> (&Connectivity, &StatusTables, &mut FieldStore) {
        (&self.conn, &self.status, &mut self.fields)
    }

    /// Number of elements of `kind`.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.conn.count(kind)
    }

    pub fn number_of_nodes(&self) -> usize {
        self.conn.number_of_nodes()
    }

    /// Shape of a raster mesh; `None` for point-cloud meshes.
    pub fn raster_shape(&self) -> Option<&RasterShape> {
        self.raster.as_ref()
    }

    /// For point-cloud meshes, the input position of every node.
    pub fn input_index(&self) -> Option<&[usize]> {
        self.input_index.as_deref()
    }

    fn check_node(&self, node: usize, status: NodeStatus) -> Result<(), MeshError> {
        let len = self.conn.number_of_nodes();
        if node >= len {
            return Err(MeshError::IndexOutOfRange {
                kind: ElementKind::Node,
                index: node,
                len,
            });
        }
        if status == NodeStatus::Core && !self.conn.node_has_cell(node) {
            return Err(MeshError::InvalidNodeStatus { node, status });
        }
        Ok(())
    }

    pub fn set_status_at_node(&mut self, node: usize, status: NodeStatus) -> Result<(), MeshError> {
        self.set_status_at_nodes(&[node], status).map(|_| ())
    }

    /// Set every node in `nodes` to `status`; returns how many changed.
    ///
    /// All ids are validated first; on error nothing changes.
    pub fn set_status_at_nodes(
        &mut self,
        nodes: &[usize],
        status: NodeStatus,
    ) -> Result<usize, MeshError> {
        for &n in nodes {
            self.check_node(n, status)?;
        }
        Ok(self
            .status
            .assign(&self.conn, nodes.iter().copied(), status))
    }

    /// Set `status` on every node for which `pred(node)` holds.
    pub fn set_status_at_nodes_where(
        &mut self,
        pred: impl Fn(usize) -> bool,
        status: NodeStatus,
    ) -> Result<usize, MeshError> {
        let nodes: Vec<usize> = (0..self.conn.number_of_nodes()).filter(|&n| pred(n)).collect();
        self.set_status_at_nodes(&nodes, status)
    }

    /// Nodes on one side of a raster.
    pub fn nodes_on_side(&self, side: Side) -> Result<Vec<usize>, MeshError> {
        self.raster
            .as_ref()
            .map(|shape| shape.nodes_on_side(side))
            .ok_or_else(|| {
                MeshError::InvalidParameter("mesh sides exist only on rasters".to_string())
            })
    }

    /// Set the status of every node on one side of a raster.
    pub fn set_status_at_perimeter(
        &mut self,
        side: Side,
        status: NodeStatus,
    ) -> Result<usize, MeshError> {
        let nodes = self.nodes_on_side(side)?;
        self.set_status_at_nodes(&nodes, status)
    }

    /// Close the selected raster sides.
    pub fn set_closed_boundaries(
        &mut self,
        right: bool,
        top: bool,
        left: bool,
        bottom: bool,
    ) -> Result<usize, MeshError> {
        let mut nodes = Vec::new();
        for (side, close) in Side::ALL.into_iter().zip([right, top, left, bottom]) {
            if close {
                nodes.extend(self.nodes_on_side(side)?);
            }
        }
        self.set_status_at_nodes(&nodes, NodeStatus::Closed)
    }

    /// Set every perimeter node to `status`.
    pub fn set_perimeter_status(&mut self, status: NodeStatus) -> Result<usize, MeshError> {
        let nodes = self.conn.perimeter_nodes().to_vec();
        self.set_status_at_nodes(&nodes, status)
    }

    /// Close every node whose value equals `nodata` (`NaN` matches `NaN`).
    pub fn set_nodata_nodes_to_closed(
        &mut self,
        values: &[f64],
        nodata: f64,
    ) -> Result<usize, MeshError> {
        crate::data::output::check_len(ElementKind::Node, values, self.conn.number_of_nodes())?;
        let is_nodata = |v: f64| v == nodata || (v.is_nan() && nodata.is_nan());
        self.set_status_at_nodes_where(|n| is_nodata(values[n]), NodeStatus::Closed)
    }
}
