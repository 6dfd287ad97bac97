//! Planar geometry helpers.

pub mod metrics;
