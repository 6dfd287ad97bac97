//! MeshError: Unified error type for mesh-flux public APIs
//!
//! Every fallible operation in the crate (construction, status edits, field
//! access, operators and the groundwater solver) reports failures through this
//! type. Errors are surfaced synchronously at the call that triggered them and
//! are never recovered internally.

use thiserror::Error;

use crate::topology::element::ElementKind;
use crate::topology::status::NodeStatus;

/// Unified error type for mesh-flux operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Construction input cannot produce a valid planar mesh.
    #[error("Malformed topology: {reason}")]
    MalformedTopology {
        /// What was wrong with the input.
        reason: String,
    },
    /// A field with this name already exists for the element kind.
    #[error("Field `{name}` already exists at {kind}")]
    DuplicateField {
        /// Element kind the field is attached to.
        kind: ElementKind,
        /// Field name.
        name: String,
    },
    /// No field with this name exists for the element kind.
    #[error("No field `{name}` at {kind}")]
    UnknownField {
        /// Element kind that was searched.
        kind: ElementKind,
        /// Field name.
        name: String,
    },
    /// An array does not have one entry per element of its kind.
    #[error("Size mismatch at {kind}: expected {expected} values, found {found}")]
    SizeMismatch {
        /// Element kind the array belongs to.
        kind: ElementKind,
        /// Current number of elements of that kind.
        expected: usize,
        /// Length of the offending array.
        found: usize,
    },
    /// The adaptive solver could not integrate the requested duration.
    #[error("Solver did not converge with {remaining} time units left: {reason}")]
    NonConvergent {
        /// Why no admissible substep could be found.
        reason: String,
        /// Duration that was still unintegrated when the solver gave up.
        remaining: f64,
    },
    /// A node status that the node's geometry cannot support.
    #[error("Node {node} cannot take status {status:?} (it has no cell)")]
    InvalidNodeStatus {
        /// Node identifier.
        node: usize,
        /// The rejected status.
        status: NodeStatus,
    },
    /// An element identifier outside the dense id range of its kind.
    #[error("Index {index} out of range for {kind} (count {len})")]
    IndexOutOfRange {
        /// Element kind.
        kind: ElementKind,
        /// Offending identifier.
        index: usize,
        /// Number of elements of that kind.
        len: usize,
    },
    /// A numeric parameter is outside its admissible range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl MeshError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MeshError::MalformedTopology {
            reason: reason.into(),
        }
    }

    pub(crate) fn size_mismatch(kind: ElementKind, expected: usize, found: usize) -> Self {
        MeshError::SizeMismatch {
            kind,
            expected,
            found,
        }
    }
}
