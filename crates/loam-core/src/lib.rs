//! Core types for loam landscape grids.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! element kinds every grid is built from, node and link status, the error
//! taxonomy shared by the workspace, and the [`FieldStore`] that owns
//! per-element value arrays.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod status;

pub use error::{ClassificationError, ConstructionError, FieldError, GridError, ShapeViewError};
pub use field::{ElementCounts, FieldHandle, FieldStore};
pub use id::{ElementKind, GridInstanceId, BAD_INDEX};
pub use status::{BoundaryKind, LinkStatus, NodeStatus};
