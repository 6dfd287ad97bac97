//! Optional output buffers for operators.
//!
//! Every operator either fills a caller-supplied slice (reusing storage such
//! as a field borrowed from the [`FieldStore`](crate::data::field::FieldStore))
//! or allocates a fresh vector. [`FieldOutput`] carries whichever was used.

use std::ops::{Deref, DerefMut};

use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;

/// Result buffer of an operator.
#[derive(Debug)]
pub enum FieldOutput<'a> {
    /// Freshly allocated result.
    Owned(Vec<f64>),
    /// Result written into the caller's buffer.
    Borrowed(&'a mut [f64]),
}

impl FieldOutput<'_> {
    /// Take the values, copying only when the buffer was borrowed.
    pub fn into_vec(self) -> Vec<f64> {
        match self {
            FieldOutput::Owned(v) => v,
            FieldOutput::Borrowed(s) => s.to_vec(),
        }
    }

    /// `true` when the caller's buffer was filled.
    pub fn is_borrowed(&self) -> bool {
        matches!(self, FieldOutput::Borrowed(_))
    }
}

impl Deref for FieldOutput<'_> {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        match self {
            FieldOutput::Owned(v) => v,
            FieldOutput::Borrowed(s) => s,
        }
    }
}

impl DerefMut for FieldOutput<'_> {
    fn deref_mut(&mut self) -> &mut [f64] {
        match self {
            FieldOutput::Owned(v) => v,
            FieldOutput::Borrowed(s) => s,
        }
    }
}

/// Fail with [`MeshError::SizeMismatch`] unless `values` has `len` entries.
pub fn check_len(kind: ElementKind, values: &[f64], len: usize) -> Result<(), MeshError> {
    if values.len() == len {
        Ok(())
    } else {
        Err(MeshError::size_mismatch(kind, len, values.len()))
    }
}

/// Use `out` if given (after checking its length), else allocate zeros.
pub fn prepare_output(
    out: Option<&mut [f64]>,
    kind: ElementKind,
    len: usize,
) -> Result<FieldOutput<'_>, MeshError> {
    match out {
        Some(buf) => {
            check_len(kind, buf, len)?;
            Ok(FieldOutput::Borrowed(buf))
        }
        None => Ok(FieldOutput::Owned(vec![0.0; len])),
    }
}
