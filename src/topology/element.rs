//! Element kinds and fixed-width adjacency tables.
//!
//! A mesh carries six dense, zero-based identity spaces. The primal kinds
//! (nodes, links, patches) and the dual kinds (cells, faces, corners) are
//! never linked through back-pointers; every relationship between them is an
//! explicit index array. One-to-many relations are stored as [`FixedTable`]s:
//! a row per element, all rows padded to the same width with a sentinel.

use static_assertions::assert_eq_size;
use std::fmt;

/// Sentinel stored in unused table slots and for missing one-to-one matches.
pub const BAD_INDEX: usize = usize::MAX;

/// The six element kinds of a primal/dual mesh.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum ElementKind {
    /// Primal point.
    Node,
    /// Directed primal connector between two nodes.
    Link,
    /// Primal polygon bounded by links.
    Patch,
    /// Dual polygon around one interior node.
    Cell,
    /// Dual segment crossing one link.
    Face,
    /// Dual vertex, one per patch.
    Corner,
}

assert_eq_size!(ElementKind, u8);

impl ElementKind {
    /// All kinds, primal first.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Node,
        ElementKind::Link,
        ElementKind::Patch,
        ElementKind::Cell,
        ElementKind::Face,
        ElementKind::Corner,
    ];

    /// Lower-case name used in field paths and messages.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Link => "link",
            ElementKind::Patch => "patch",
            ElementKind::Cell => "cell",
            ElementKind::Face => "face",
            ElementKind::Corner => "corner",
        }
    }

    /// `true` for cells, faces and corners.
    pub fn is_dual(self) -> bool {
        matches!(
            self,
            ElementKind::Cell | ElementKind::Face | ElementKind::Corner
        )
    }

    /// The kind on the other side of the primal/dual correspondence.
    pub fn dual(self) -> ElementKind {
        match self {
            ElementKind::Node => ElementKind::Cell,
            ElementKind::Link => ElementKind::Face,
            ElementKind::Patch => ElementKind::Corner,
            ElementKind::Cell => ElementKind::Node,
            ElementKind::Face => ElementKind::Link,
            ElementKind::Corner => ElementKind::Patch,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-major table with a constant number of slots per element.
///
/// Rows shorter than the table width are padded with the table's `pad`
/// value ([`BAD_INDEX`] for id tables, `0` for direction tables).
#[derive(Clone, Debug, PartialEq)]
pub struct FixedTable<T> {
    width: usize,
    pad: T,
    data: Vec<T>,
}

/// Table of element ids padded with [`BAD_INDEX`].
pub type IdTable = FixedTable<usize>;

/// Table of link directions (`+1` into, `-1` out of the row element) padded with `0`.
pub type DirTable = FixedTable<i8>;

impl<T: Copy + PartialEq> FixedTable<T> {
    /// Build a table from ragged rows; width is the longest row (or `min_width`).
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R], min_width: usize, pad: T) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().len())
            .max()
            .unwrap_or(0)
            .max(min_width);
        let mut data = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            data.extend_from_slice(row);
            data.extend(std::iter::repeat_n(pad, width - row.len()));
        }
        Self { width, pad, data }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Padding value.
    pub fn pad(&self) -> T {
        self.pad
    }

    /// The full row `i`, padding included.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// Non-padding entries of row `i`, in stored order.
    #[inline]
    pub fn entries(&self, i: usize) -> impl Iterator<Item = T> + '_ {
        let pad = self.pad;
        self.row(i).iter().copied().filter(move |&v| v != pad)
    }

    /// Number of non-padding entries in row `i`.
    pub fn count_at(&self, i: usize) -> usize {
        self.entries(i).count()
    }

    /// Flat row-major view.
    pub fn as_flat(&self) -> &[T] {
        &self.data
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.width.max(1))
    }
}

/// Collect the indices `i` for which `pred(i)` holds, in ascending order.
pub(crate) fn ids_where(len: usize, mut pred: impl FnMut(usize) -> bool) -> Vec<usize> {
    (0..len).filter(|&i| pred(i)).collect()
}
