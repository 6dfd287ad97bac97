//! # mesh-flux
//!
//! mesh-flux is a planar mesh library for finite-volume simulation. It builds
//! a primal mesh (nodes, links, patches) together with its dual (cells,
//! faces, corners), tracks boundary status, stores named per-element fields,
//! and provides the discrete operators and an explicit Dupuit groundwater
//! solver built on them.
//!
//! ## Features
//! - Structured rasters and unstructured Delaunay/Voronoi meshes behind one
//!   [`MeshLayout`](topology::MeshLayout) construction trait
//! - Dense, row-major element numbering with sentinel-padded adjacency tables
//!   ordered counter-clockwise from east
//! - Node boundary status with eagerly derived link status
//! - Gradient, difference, net-flux and divergence operators with optional
//!   output buffers
//! - Adaptive-timestep Dupuit percolator with full mass-balance diagnostics
//!
//! ## Determinism
//!
//! Construction, operators and the solver are single-threaded and free of
//! hidden state: repeated calls with the same input give bit-identical
//! output. Tests that need random point clouds draw them from fixed
//! `SmallRng` seeds.
//!
//! ## Usage
//! ```
//! use mesh_flux::prelude::*;
//!
//! let mut mesh = Mesh::raster_uniform(3, 4, 10.0).unwrap();
//! mesh.set_perimeter_status(NodeStatus::Closed).unwrap();
//! let mut z = vec![0.0; mesh.number_of_nodes()];
//! z[5] = 5.0;
//! z[6] = 3.6;
//! let grad = calc_grad_at_link(mesh.connectivity(), &z, None).unwrap();
//! assert_eq!(grad[4], 0.5);
//! ```

pub mod algs;
pub mod data;
pub mod geometry;
pub mod mesh;
pub mod mesh_error;
pub mod mesh_generation;
pub mod physics;
pub mod topology;

/// A convenient prelude to import the most-used types and operators:
pub mod prelude {
    pub use crate::algs::calculus::{
        calc_diff_at_link, calc_flux_div_at_node, calc_grad_at_link, calc_net_flux_at_node,
    };
    pub use crate::algs::mappers::*;
    pub use crate::data::field::FieldStore;
    pub use crate::data::output::FieldOutput;
    pub use crate::mesh::Mesh;
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{RasterShape, Side};
    pub use crate::physics::{DupuitConfig, DupuitPercolator, MassBalance};
    pub use crate::topology::{
        BAD_INDEX, Connectivity, ElementKind, LinkStatus, MeshLayout, NodeStatus, StatusTables,
    };
}
