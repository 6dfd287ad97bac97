//! Data module: named fields and operator output buffers.
#![warn(missing_docs)]

pub mod field;
pub mod output;

pub use field::FieldStore;
pub use output::FieldOutput;
