//! Top-level module for mesh topology.
//!
//! This module provides the element registry, the connectivity builder and
//! the boundary status tables:
//! - [`element`]: the six element kinds and padded adjacency tables
//! - [`layout`]: the [`MeshLayout`] trait implemented by every mesh variant
//! - [`connectivity`]: derivation of all primal/dual tables and geometry
//! - [`status`]: node boundary status and the link status derived from it

pub mod connectivity;
pub mod element;
pub mod layout;
pub mod status;

pub use connectivity::Connectivity;
pub use element::{BAD_INDEX, DirTable, ElementKind, FixedTable, IdTable};
pub use layout::MeshLayout;
pub use status::{LinkStatus, NodeStatus, StatusTables, link_status_from_nodes};
