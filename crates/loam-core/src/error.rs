//! Error types for grid construction, boundary classification, field
//! access and raster views.
//!
//! Organised by subsystem. Every error is raised synchronously by the call
//! that violates the contract; [`GridError`] wraps all four for callers that
//! drive a whole setup sequence with `?`.

use std::error::Error;
use std::fmt;

use crate::id::ElementKind;
use crate::status::NodeStatus;

/// Errors from the topology generator.
///
/// A failed construction never produces a grid.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionError {
    /// A raster needs at least two rows and two columns to hold a link.
    InvalidShape {
        /// Requested number of node rows.
        rows: usize,
        /// Requested number of node columns.
        cols: usize,
    },
    /// Node spacing must be finite and strictly positive on both axes.
    InvalidSpacing {
        /// Requested spacing along x.
        dx: f64,
        /// Requested spacing along y.
        dy: f64,
    },
    /// The lower-left origin must be finite.
    InvalidOrigin {
        /// Requested x of the lower-left node.
        x: f64,
        /// Requested y of the lower-left node.
        y: f64,
    },
    /// The node count exceeds the largest raster the topology can index.
    TooLarge {
        /// Requested number of node rows.
        rows: usize,
        /// Requested number of node columns.
        cols: usize,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { rows, cols } => {
                write!(
                    f,
                    "invalid raster shape {rows}x{cols}: need at least 2 rows and 2 columns"
                )
            }
            Self::InvalidSpacing { dx, dy } => {
                write!(f, "invalid node spacing ({dx}, {dy}): must be finite and > 0")
            }
            Self::InvalidOrigin { x, y } => {
                write!(f, "invalid origin ({x}, {y}): must be finite")
            }
            Self::TooLarge { rows, cols } => {
                write!(f, "raster shape {rows}x{cols} exceeds the supported node count")
            }
        }
    }
}

impl Error for ConstructionError {}

/// Errors from the boundary classifier.
///
/// A failed classification leaves every node status untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassificationError {
    /// The requested outlet is closed (or holds nodata), so nothing could
    /// drain through it; or no candidate outlet exists at all.
    NoValidOutlet {
        /// The rejected outlet, if one was named.
        node: Option<usize>,
    },
    /// The requested status contradicts the node's place in the grid.
    ConflictingStatus {
        /// The node being reclassified.
        node: usize,
        /// The status that was refused.
        status: NodeStatus,
    },
    /// A node id beyond the grid's node count.
    NodeOutOfBounds {
        /// The offending node id.
        node: usize,
        /// Number of nodes in the grid.
        count: usize,
    },
    /// A per-node value array whose length is not the node count.
    ValuesLengthMismatch {
        /// Number of nodes in the grid.
        expected: usize,
        /// Length of the array supplied.
        actual: usize,
    },
}

impl fmt::Display for ClassificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValidOutlet { node: Some(node) } => {
                write!(f, "node {node} is closed and cannot be an outlet")
            }
            Self::NoValidOutlet { node: None } => {
                write!(f, "no open node is available to serve as an outlet")
            }
            Self::ConflictingStatus { node, status } => {
                write!(f, "node {node} lies on the grid perimeter and cannot be {status}")
            }
            Self::NodeOutOfBounds { node, count } => {
                write!(f, "node {node} out of bounds: grid has {count} nodes")
            }
            Self::ValuesLengthMismatch { expected, actual } => {
                write!(f, "expected {expected} node values, got {actual}")
            }
        }
    }
}

impl Error for ClassificationError {}

/// Errors from the field store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// No field with this name is registered on this element kind.
    UnknownField {
        /// Element kind searched.
        kind: ElementKind,
        /// Name looked up.
        name: String,
    },
    /// The array does not have one value per element.
    SizeMismatch {
        /// Element kind the field was meant for.
        kind: ElementKind,
        /// Name of the field.
        name: String,
        /// Number of elements of that kind.
        expected: usize,
        /// Length of the array supplied.
        actual: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { kind, name } => {
                write!(f, "no field '{name}' at {kind}")
            }
            Self::SizeMismatch {
                kind,
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "field '{name}' at {kind} needs {expected} values, got {actual}"
                )
            }
        }
    }
}

impl Error for FieldError {}

/// Errors from reshaping node arrays into row-major raster views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeViewError {
    /// The grid has no row/column structure.
    NotARaster,
    /// The array does not have one value per node.
    LengthMismatch {
        /// Number of nodes (`rows * cols`).
        expected: usize,
        /// Length of the array supplied.
        actual: usize,
    },
}

impl fmt::Display for ShapeViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARaster => write!(f, "grid is not a structured raster"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "cannot reshape {actual} values onto {expected} nodes")
            }
        }
    }
}

impl Error for ShapeViewError {}

/// Any error raised while setting up or querying a grid.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// See [`ConstructionError`].
    Construction(ConstructionError),
    /// See [`ClassificationError`].
    Classification(ClassificationError),
    /// See [`FieldError`].
    Field(FieldError),
    /// See [`ShapeViewError`].
    ShapeView(ShapeViewError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction(e) => write!(f, "construction error: {e}"),
            Self::Classification(e) => write!(f, "classification error: {e}"),
            Self::Field(e) => write!(f, "field access error: {e}"),
            Self::ShapeView(e) => write!(f, "shape view error: {e}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Construction(e) => Some(e),
            Self::Classification(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::ShapeView(e) => Some(e),
        }
    }
}

impl From<ConstructionError> for GridError {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl From<ClassificationError> for GridError {
    fn from(e: ClassificationError) -> Self {
        Self::Classification(e)
    }
}

impl From<FieldError> for GridError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<ShapeViewError> for GridError {
    fn from(e: ShapeViewError) -> Self {
        Self::ShapeView(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_exposes_source() {
        let err: GridError = FieldError::UnknownField {
            kind: ElementKind::Node,
            name: "topographic__elevation".into(),
        }
        .into();
        let source = err.source().expect("wrapped error has a source");
        assert_eq!(
            source.to_string(),
            "no field 'topographic__elevation' at node"
        );
    }

    #[test]
    fn outlet_messages_distinguish_named_and_missing() {
        let named = ClassificationError::NoValidOutlet { node: Some(7) };
        let missing = ClassificationError::NoValidOutlet { node: None };
        assert!(named.to_string().contains("node 7"));
        assert!(missing.to_string().contains("no open node"));
    }

    #[test]
    fn conflicting_status_names_the_status() {
        let err = ClassificationError::ConflictingStatus {
            node: 0,
            status: NodeStatus::Core,
        };
        assert_eq!(
            err.to_string(),
            "node 0 lies on the grid perimeter and cannot be core"
        );
    }
}
