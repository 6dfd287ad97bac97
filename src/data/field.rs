//! Named per-element value arrays.
//!
//! A [`FieldStore`] keeps one namespace per [`ElementKind`]. A field is valid
//! only while its length equals the element count of its kind, which the
//! store enforces on insertion and re-checks whenever the counts change.

use std::collections::BTreeMap;

use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;

const KINDS: usize = ElementKind::ALL.len();

fn slot(kind: ElementKind) -> usize {
    kind as usize
}

/// Named `f64` arrays grouped by element kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldStore {
    counts: [usize; KINDS],
    fields: [BTreeMap<String, Vec<f64>>; KINDS],
}

impl FieldStore {
    /// An empty store sized for the given element counts (indexed by
    /// [`ElementKind::ALL`]).
    pub fn new(counts: [usize; KINDS]) -> Self {
        Self {
            counts,
            fields: Default::default(),
        }
    }

    /// Current element count of `kind`.
    pub fn count(&self, kind: ElementKind) -> usize {
        self.counts[slot(kind)]
    }

    /// Attach `values` under `name`.
    ///
    /// # Errors
    /// [`MeshError::DuplicateField`] if the name exists and `overwrite` is
    /// false; [`MeshError::SizeMismatch`] if `values` does not have one entry
    /// per element.
    pub fn add_field(
        &mut self,
        kind: ElementKind,
        name: &str,
        values: Vec<f64>,
        overwrite: bool,
    ) -> Result<&mut [f64], MeshError> {
        let expected = self.count(kind);
        if values.len() != expected {
            return Err(MeshError::size_mismatch(kind, expected, values.len()));
        }
        let map = &mut self.fields[slot(kind)];
        if !overwrite && map.contains_key(name) {
            return Err(MeshError::DuplicateField {
                kind,
                name: name.to_owned(),
            });
        }
        map.insert(name.to_owned(), values);
        self.field_mut(kind, name)
    }

    /// Create a field filled with `fill`.
    pub fn add_full(
        &mut self,
        kind: ElementKind,
        name: &str,
        fill: f64,
        overwrite: bool,
    ) -> Result<&mut [f64], MeshError> {
        let values = vec![fill; self.count(kind)];
        self.add_field(kind, name, values, overwrite)
    }

    /// Create a zero-filled field.
    pub fn add_zeros(
        &mut self,
        kind: ElementKind,
        name: &str,
        overwrite: bool,
    ) -> Result<&mut [f64], MeshError> {
        self.add_full(kind, name, 0.0, overwrite)
    }

    /// Create a field filled with ones.
    pub fn add_ones(
        &mut self,
        kind: ElementKind,
        name: &str,
        overwrite: bool,
    ) -> Result<&mut [f64], MeshError> {
        self.add_full(kind, name, 1.0, overwrite)
    }

    /// Read a field.
    pub fn field(&self, kind: ElementKind, name: &str) -> Result<&[f64], MeshError> {
        self.fields[slot(kind)]
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| unknown(kind, name))
    }

    /// Mutate a field in place. Its length cannot change.
    pub fn field_mut(&mut self, kind: ElementKind, name: &str) -> Result<&mut [f64], MeshError> {
        self.fields[slot(kind)]
            .get_mut(name)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| unknown(kind, name))
    }

    /// Remove a field and hand back its values.
    pub fn delete_field(&mut self, kind: ElementKind, name: &str) -> Result<Vec<f64>, MeshError> {
        self.fields[slot(kind)]
            .remove(name)
            .ok_or_else(|| unknown(kind, name))
    }

    /// `true` if `kind` has a field called `name`.
    pub fn has_field(&self, kind: ElementKind, name: &str) -> bool {
        self.fields[slot(kind)].contains_key(name)
    }

    /// Field names of `kind`, sorted.
    pub fn names(&self, kind: ElementKind) -> Vec<&str> {
        self.fields[slot(kind)].keys().map(String::as_str).collect()
    }

    /// Drop every field of `kind`.
    pub fn clear(&mut self, kind: ElementKind) {
        self.fields[slot(kind)].clear();
    }

    /// Adopt new element counts, dropping every field whose kind changed size.
    ///
    /// Returns the dropped `(kind, name)` pairs.
    pub fn set_counts(&mut self, counts: [usize; KINDS]) -> Vec<(ElementKind, String)> {
        let mut dropped = Vec::new();
        for kind in ElementKind::ALL {
            let s = slot(kind);
            if self.counts[s] != counts[s] {
                for name in std::mem::take(&mut self.fields[s]).into_keys() {
                    log::warn!(
                        "dropping field `{name}` at {kind}: count changed {} -> {}",
                        self.counts[s],
                        counts[s]
                    );
                    dropped.push((kind, name));
                }
            }
        }
        self.counts = counts;
        dropped
    }
}

fn unknown(kind: ElementKind, name: &str) -> MeshError {
    MeshError::UnknownField {
        kind,
        name: name.to_owned(),
    }
}
