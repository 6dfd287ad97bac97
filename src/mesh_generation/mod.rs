//! Mesh generators: structured rasters and Delaunay/Voronoi point clouds.
//!
//! Each generator produces a [`MeshLayout`](crate::topology::layout::MeshLayout)
//! that [`Connectivity::build`](crate::topology::connectivity::Connectivity::build)
//! turns into a complete primal/dual mesh.

pub mod delaunay;
pub mod raster;
pub mod voronoi;

pub use delaunay::triangulate;
pub use raster::{RasterLayout, RasterShape, Side};
pub use voronoi::VoronoiLayout;
